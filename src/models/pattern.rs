/// How many times the user filed one normalized description under one category.
///
/// One row per (description, category) pair, so a description the user has
/// filed under two categories shows up twice with independent counts.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAssignmentPattern {
    pub id: Option<i64>,
    /// Normalized (lowercase, trimmed) description.
    pub description: String,
    pub category_id: i64,
    pub count: u32,
    /// Informational only; ranking ignores it.
    pub last_used: String,
}

impl UserAssignmentPattern {
    #[cfg(test)]
    pub fn new(description: String, category_id: i64, count: u32) -> Self {
        Self {
            id: None,
            description,
            category_id,
            count,
            last_used: chrono::Utc::now().to_rfc3339(),
        }
    }
}
