#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn category_id(db: &Database, name: &str) -> i64 {
    db.find_category_by_name(name).unwrap().unwrap().id.unwrap()
}

fn names(categories: &[Category]) -> Vec<&str> {
    categories.iter().map(|c| c.name.as_str()).collect()
}

fn expense(description: &str) -> Transaction {
    Transaction::new("2026-03-14".into(), description.into(), dec!(-4.50))
}

// ── Suggestions ───────────────────────────────────────────────

#[test]
fn test_suggest_uses_keywords_without_history() {
    let db = Database::open_in_memory().unwrap();
    let suggester = Suggester::default();
    let result = suggest_categories(&db, &suggester, "Starbucks Coffee").unwrap();
    assert_eq!(names(&result), vec!["Food & Dining"]);
}

#[test]
fn test_suggest_empty_description() {
    let db = Database::open_in_memory().unwrap();
    let suggester = Suggester::default();
    assert!(suggest_categories(&db, &suggester, "   ").unwrap().is_empty());
}

#[test]
fn test_learned_pattern_takes_over_after_three_assignments() {
    let db = Database::open_in_memory().unwrap();
    let suggester = Suggester::default();
    let groceries = category_id(&db, "Groceries");

    for _ in 0..2 {
        record_category_assignment(&db, "Starbucks Coffee", groceries);
    }
    let detailed = suggest_detailed(&db, &suggester, "starbucks coffee").unwrap();
    assert_eq!(detailed.len(), 1);
    assert_eq!(detailed[0].0.name, "Food & Dining");
    assert_eq!(detailed[0].1, SuggestionSource::Keyword);

    record_category_assignment(&db, "  STARBUCKS COFFEE ", groceries);
    let detailed = suggest_detailed(&db, &suggester, "starbucks coffee").unwrap();
    assert_eq!(detailed.len(), 1);
    assert_eq!(detailed[0].0.name, "Groceries");
    assert_eq!(detailed[0].1, SuggestionSource::Learned);
}

// ── Recording ─────────────────────────────────────────────────

#[test]
fn test_record_normalizes_description() {
    let db = Database::open_in_memory().unwrap();
    let rent = category_id(&db, "Rent");
    record_category_assignment(&db, "  Landlord LLC ", rent);
    record_category_assignment(&db, "landlord llc", rent);
    let patterns = db.get_patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].description, "landlord llc");
    assert_eq!(patterns[0].count, 2);
}

#[test]
fn test_record_skips_blank_description() {
    let db = Database::open_in_memory().unwrap();
    record_category_assignment(&db, "   ", category_id(&db, "Rent"));
    assert!(db.get_patterns().unwrap().is_empty());
}

#[test]
fn test_record_unknown_category_is_swallowed() {
    let db = Database::open_in_memory().unwrap();
    record_category_assignment(&db, "mystery", 9999);
    assert!(db.get_patterns().unwrap().is_empty());
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_add_transaction_with_category_records_pattern() {
    let db = Database::open_in_memory().unwrap();
    let mut txn = expense("Shell Gas Station");
    txn.category_id = Some(category_id(&db, "Transport"));
    let id = add_transaction(&db, &txn).unwrap();

    let saved = db.get_transaction_by_id(id).unwrap().unwrap();
    assert_eq!(saved.category_id, txn.category_id);
    let patterns = db.get_patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].description, "shell gas station");
}

#[test]
fn test_add_transaction_without_category_records_nothing() {
    let db = Database::open_in_memory().unwrap();
    add_transaction(&db, &expense("Shell Gas Station")).unwrap();
    assert!(db.get_patterns().unwrap().is_empty());
}

#[test]
fn test_add_transaction_invalid_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    let mut txn = expense("Zero");
    txn.amount = dec!(0);
    txn.category_id = Some(category_id(&db, "Transport"));
    assert!(add_transaction(&db, &txn).is_err());
    assert!(db.get_patterns().unwrap().is_empty());
}

#[test]
fn test_assign_category_updates_and_records() {
    let db = Database::open_in_memory().unwrap();
    let id = add_transaction(&db, &expense("Corner Shop")).unwrap();
    let groceries = category_id(&db, "Groceries");

    assign_category(&db, id, groceries).unwrap();
    let saved = db.get_transaction_by_id(id).unwrap().unwrap();
    assert_eq!(saved.category_id, Some(groceries));
    let patterns = db.get_patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].category_id, groceries);
}

#[test]
fn test_assign_category_missing_targets() {
    let db = Database::open_in_memory().unwrap();
    let id = add_transaction(&db, &expense("Corner Shop")).unwrap();
    assert!(assign_category(&db, 9999, category_id(&db, "Groceries")).is_err());
    assert!(assign_category(&db, id, 9999).is_err());
    assert!(db.get_patterns().unwrap().is_empty());
}

// ── Auto-categorize ───────────────────────────────────────────

#[test]
fn test_autocategorize_fills_uncategorized_only() {
    let db = Database::open_in_memory().unwrap();
    let suggester = Suggester::default();
    let rent = category_id(&db, "Rent");

    let uber = add_transaction(&db, &expense("Uber trip")).unwrap();
    let unknown = add_transaction(&db, &expense("zzzz")).unwrap();
    let mut fixed = expense("Uber trip");
    fixed.category_id = Some(rent);
    let fixed = add_transaction(&db, &fixed).unwrap();

    assert_eq!(autocategorize(&db, &suggester).unwrap(), 1);
    let transport = category_id(&db, "Transport");
    assert_eq!(
        db.get_transaction_by_id(uber).unwrap().unwrap().category_id,
        Some(transport)
    );
    assert_eq!(
        db.get_transaction_by_id(unknown).unwrap().unwrap().category_id,
        None
    );
    assert_eq!(
        db.get_transaction_by_id(fixed).unwrap().unwrap().category_id,
        Some(rent)
    );
    // only the manual assignment was learned
    assert_eq!(db.get_patterns().unwrap().len(), 1);
}

#[test]
fn test_autocategorize_nothing_to_do() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(autocategorize(&db, &Suggester::default()).unwrap(), 0);
}
