use rust_decimal::Decimal;

/// Longest description the CRUD layer accepts.
pub const MAX_DESCRIPTION_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Positive amounts are income; zero and negative amounts are expenses.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Income
        } else {
            Self::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Transaction {
    pub fn new(date: String, description: String, amount: Decimal) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            date,
            description,
            amount,
            category_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::from_amount(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type() == TransactionType::Income
    }
}
