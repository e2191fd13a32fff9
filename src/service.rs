//! Operations that combine storage with the suggestion engine.

use anyhow::Result;

use crate::db::Database;
use crate::models::{Category, Transaction};
use crate::suggest::{normalize, SuggestionSource, Suggester};

/// Suggestions for `description` against the current categories and
/// learned patterns.
pub(crate) fn suggest_categories(
    db: &Database,
    suggester: &Suggester,
    description: &str,
) -> Result<Vec<Category>> {
    Ok(suggest_detailed(db, suggester, description)?
        .into_iter()
        .map(|(category, _)| category)
        .collect())
}

pub(crate) fn suggest_detailed(
    db: &Database,
    suggester: &Suggester,
    description: &str,
) -> Result<Vec<(Category, SuggestionSource)>> {
    let categories = db.get_categories()?;
    let patterns = db.get_patterns()?;
    Ok(suggester
        .suggest_detailed(description, &categories, &patterns)
        .into_iter()
        .map(|s| (s.category.clone(), s.source))
        .collect())
}

/// Remember that the user filed `description` under `category_id`.
///
/// Failures are logged, never returned.
pub(crate) fn record_category_assignment(db: &Database, description: &str, category_id: i64) {
    let normalized = normalize(description);
    if normalized.is_empty() {
        return;
    }
    match db.record_pattern(&normalized, category_id) {
        Ok(()) => tracing::debug!(description = %normalized, category_id, "recorded assignment"),
        Err(e) => tracing::warn!(
            description = %normalized,
            category_id,
            error = %e,
            "failed to record category assignment"
        ),
    }
}

/// Save a user-entered transaction. A chosen category counts as a
/// confirmed assignment.
pub(crate) fn add_transaction(db: &Database, txn: &Transaction) -> Result<i64> {
    let id = db.insert_transaction(txn)?;
    if let Some(category_id) = txn.category_id {
        record_category_assignment(db, &txn.description, category_id);
    }
    Ok(id)
}

/// Move one transaction to another category and learn from it.
pub(crate) fn assign_category(db: &Database, transaction_id: i64, category_id: i64) -> Result<()> {
    let txn = db
        .get_transaction_by_id(transaction_id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction {transaction_id} not found"))?;
    if db.get_category_by_id(category_id)?.is_none() {
        anyhow::bail!("Category {category_id} not found");
    }
    db.update_transaction_category(transaction_id, Some(category_id))?;
    record_category_assignment(db, &txn.description, category_id);
    Ok(())
}

/// Give every uncategorized transaction its top suggestion. Automatic
/// assignments are not recorded as patterns. Returns how many changed.
pub(crate) fn autocategorize(db: &Database, suggester: &Suggester) -> Result<usize> {
    let mut txns = db.get_uncategorized_transactions()?;
    if txns.is_empty() {
        return Ok(0);
    }
    let categories = db.get_categories()?;
    let patterns = db.get_patterns()?;

    let count = suggester.categorize_batch(&mut txns, &categories, &patterns);
    for txn in &txns {
        if let (Some(id), Some(category_id)) = (txn.id, txn.category_id) {
            db.update_transaction_category(id, Some(category_id))?;
        }
    }
    tracing::info!(count, "auto-categorized transactions");
    Ok(count)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
