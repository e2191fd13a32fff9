#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::transaction::TransactionType;
use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal) -> Transaction {
    Transaction::new("2024-01-15".into(), "Test".into(), amount)
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00));
    assert!(txn.is_income());
    assert_eq!(txn.transaction_type(), TransactionType::Income);
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(-50.00));
    assert!(!txn.is_income());
    assert_eq!(txn.transaction_type(), TransactionType::Expense);
}

#[test]
fn test_zero_is_treated_as_expense_type() {
    let txn = make_txn(Decimal::ZERO);
    assert!(!txn.is_income());
    assert_eq!(txn.transaction_type(), TransactionType::Expense);
}

#[test]
fn test_transaction_type_labels() {
    assert_eq!(TransactionType::Income.as_str(), "income");
    assert_eq!(TransactionType::Expense.as_str(), "expense");
}

#[test]
fn test_transaction_new_defaults() {
    let txn = make_txn(dec!(-5));
    assert!(txn.id.is_none());
    assert!(txn.category_id.is_none());
    assert!(!txn.created_at.is_empty());
    assert_eq!(txn.created_at, txn.updated_at);
}

// ── CategoryType ──────────────────────────────────────────────

#[test]
fn test_category_type_parse() {
    assert_eq!(CategoryType::parse("income"), Some(CategoryType::Income));
    assert_eq!(CategoryType::parse("EXPENSE"), Some(CategoryType::Expense));
    assert_eq!(CategoryType::parse(" Expense "), Some(CategoryType::Expense));
    assert_eq!(CategoryType::parse("transfer"), None);
}

#[test]
fn test_category_type_display() {
    assert_eq!(format!("{}", CategoryType::Income), "income");
    assert_eq!(format!("{}", CategoryType::Expense), "expense");
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_new() {
    let cat = Category::new("Food".into(), CategoryType::Expense);
    assert!(cat.id.is_none());
    assert_eq!(cat.name, "Food");
    assert!(cat.icon.is_empty());
    assert!(cat.color.is_empty());
    assert!(!cat.is_default);
}

#[test]
fn test_category_display() {
    let cat = Category::new("Groceries".into(), CategoryType::Expense);
    assert_eq!(format!("{cat}"), "Groceries");
}

#[test]
fn test_category_find_by_name_case_insensitive() {
    let mut food = Category::new("Food & Dining".into(), CategoryType::Expense);
    food.id = Some(1);
    let cats = vec![food];
    assert_eq!(
        Category::find_by_name(&cats, "food & dining").unwrap().id,
        Some(1)
    );
    assert!(Category::find_by_name(&cats, "Food").is_none());
}

#[test]
fn test_category_find_by_id() {
    let mut a = Category::new("A".into(), CategoryType::Expense);
    a.id = Some(7);
    let b = Category::new("B".into(), CategoryType::Expense);
    let cats = vec![a, b];
    assert_eq!(Category::find_by_id(&cats, 7).unwrap().name, "A");
    assert!(Category::find_by_id(&cats, 8).is_none());
}

#[test]
fn test_default_categories_split() {
    let income = DEFAULT_CATEGORIES
        .iter()
        .filter(|(_, t, _, _)| *t == CategoryType::Income)
        .count();
    assert_eq!(DEFAULT_CATEGORIES.len(), 15);
    assert_eq!(income, 5);
}

// ── UserAssignmentPattern ─────────────────────────────────────

#[test]
fn test_pattern_new() {
    let p = UserAssignmentPattern::new("starbucks".into(), 3, 1);
    assert!(p.id.is_none());
    assert_eq!(p.count, 1);
    assert_eq!(p.category_id, 3);
    assert!(!p.last_used.is_empty());
}
