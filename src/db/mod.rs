mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

const CATEGORY_COLUMNS: &str =
    "id, name, category_type, icon, color, is_default, created_at, updated_at";
const TRANSACTION_COLUMNS: &str = "id, date, description, amount, category_id, created_at, updated_at";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        category_type: parse_category_type(&row.get::<_, String>(2)?)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        is_default: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn parse_category_type(raw: &str) -> rusqlite::Result<CategoryType> {
    CategoryType::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown category type '{raw}'").into(),
        )
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(3)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        category_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Missing schema version")?;
        if version != schema::CURRENT_VERSION {
            anyhow::bail!(
                "Unsupported schema version {version} (expected {})",
                schema::CURRENT_VERSION
            );
        }
        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        for (name, category_type, icon, color) in DEFAULT_CATEGORIES {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, category_type, icon, color, is_default, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
                params![name, category_type.as_str(), icon, color, now],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            category_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive lookup, matching the uniqueness rule for names.
    pub(crate) fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let categories = self.get_categories()?;
        Ok(Category::find_by_name(&categories, name).cloned())
    }

    /// Trimmed name if it is non-empty, short enough, and not already taken
    /// by another category (ignoring case).
    fn validate_category_name(&self, name: &str, exclude_id: Option<i64>) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Category name is required");
        }
        if trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
            anyhow::bail!("Category name must be {MAX_CATEGORY_NAME_LEN} characters or less");
        }
        if let Some(existing) = self.find_category_by_name(trimmed)? {
            if existing.id != exclude_id {
                anyhow::bail!("Category \"{}\" already exists", existing.name);
            }
        }
        Ok(trimmed.to_string())
    }

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        let name = self.validate_category_name(&cat.name, None)?;
        self.conn.execute(
            "INSERT INTO categories (name, category_type, icon, color, is_default, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                name,
                cat.category_type.as_str(),
                cat.icon,
                cat.color,
                cat.is_default,
                cat.created_at,
                cat.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn rename_category(&self, id: i64, new_name: &str) -> Result<()> {
        let existing = self
            .get_category_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("Category {id} not found"))?;
        self.update_category(id, new_name, &existing.icon, &existing.color)
    }

    /// Replace a category's name, icon and color. The name follows the same
    /// rules as on insert, ignoring the category itself.
    pub(crate) fn update_category(&self, id: i64, name: &str, icon: &str, color: &str) -> Result<()> {
        let name = self.validate_category_name(name, Some(id))?;
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1, icon = ?2, color = ?3, updated_at = ?4 WHERE id = ?5",
            params![name, icon, color, chrono::Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            anyhow::bail!("Category {id} not found");
        }
        Ok(())
    }

    /// Delete a custom category, moving its transactions to `reassign_to`
    /// (or leaving them uncategorized) and dropping its learned patterns.
    /// Default categories cannot be deleted. Returns the number of
    /// transactions moved.
    pub(crate) fn delete_category(&mut self, id: i64, reassign_to: Option<i64>) -> Result<usize> {
        let category = self
            .get_category_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("Category {id} not found"))?;
        if category.is_default {
            anyhow::bail!("\"{}\" is a default category and cannot be deleted", category.name);
        }
        if let Some(target) = reassign_to {
            if target == id {
                anyhow::bail!("Cannot reassign a category's transactions to itself");
            }
            if self.get_category_by_id(target)?.is_none() {
                anyhow::bail!("Category {target} not found");
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let moved = tx.execute(
            "UPDATE transactions SET category_id = ?1, updated_at = ?2 WHERE category_id = ?3",
            params![reassign_to, now, id],
        )?;
        tx.execute(
            "DELETE FROM category_patterns WHERE category_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(moved)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Trimmed description of a transaction that is fit to store.
    fn validate_transaction(txn: &Transaction) -> Result<&str> {
        let description = txn.description.trim();
        if description.is_empty() {
            anyhow::bail!("Description is required");
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            anyhow::bail!("Description cannot exceed {MAX_DESCRIPTION_LEN} characters");
        }
        if txn.amount.is_zero() {
            anyhow::bail!("Amount cannot be zero");
        }
        NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", txn.date))?;
        Ok(description)
    }

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        let description = Self::validate_transaction(txn)?;
        self.conn.execute(
            "INSERT INTO transactions (date, description, amount, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                txn.date,
                description,
                txn.amount.to_string(),
                txn.category_id,
                txn.created_at,
                txn.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Newest first.
    pub(crate) fn get_transactions(
        &self,
        limit: Option<u32>,
        category_id: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(cid) = category_id {
            sql.push_str(" WHERE category_id = ?1");
            param_values.push(Box::new(cid));
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_uncategorized_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE category_id IS NULL ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
            params![id],
            transaction_from_row,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// Overwrite date, description and amount of a stored transaction.
    /// The category is left alone.
    pub(crate) fn update_transaction(&self, txn: &Transaction) -> Result<()> {
        let id = txn
            .id
            .ok_or_else(|| anyhow::anyhow!("Transaction has no ID"))?;
        let description = Self::validate_transaction(txn)?;
        let changed = self.conn.execute(
            "UPDATE transactions SET date = ?1, description = ?2, amount = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                txn.date,
                description,
                txn.amount.to_string(),
                chrono::Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Transaction {id} not found");
        }
        Ok(())
    }

    pub(crate) fn update_transaction_category(
        &self,
        transaction_id: i64,
        category_id: Option<i64>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE transactions SET category_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![category_id, chrono::Utc::now().to_rfc3339(), transaction_id],
        )?;
        if changed == 0 {
            anyhow::bail!("Transaction {transaction_id} not found");
        }
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Move every transaction in `old_category_id` to `new_category_id`.
    pub(crate) fn reassign_category(
        &mut self,
        old_category_id: i64,
        new_category_id: Option<i64>,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let moved = tx.execute(
            "UPDATE transactions SET category_id = ?1, updated_at = ?2 WHERE category_id = ?3",
            params![new_category_id, chrono::Utc::now().to_rfc3339(), old_category_id],
        )?;
        tx.commit()?;
        Ok(moved)
    }

    // ── Learned patterns ──────────────────────────────────────

    /// All patterns in the order they were first recorded.
    pub(crate) fn get_patterns(&self) -> Result<Vec<UserAssignmentPattern>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, category_id, count, last_used FROM category_patterns ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserAssignmentPattern {
                id: Some(row.get(0)?),
                description: row.get(1)?,
                category_id: row.get(2)?,
                count: row.get(3)?,
                last_used: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Count one more observation of `description` → `category_id`.
    /// `description` must already be normalized.
    pub(crate) fn record_pattern(&self, description: &str, category_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO category_patterns (description, category_id, count, last_used)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT(description, category_id)
             DO UPDATE SET count = count + 1, last_used = excluded.last_used",
            params![description, category_id, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
