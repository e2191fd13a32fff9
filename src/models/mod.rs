mod category;
mod pattern;
mod transaction;

pub use category::{Category, CategoryType, DEFAULT_CATEGORIES, MAX_CATEGORY_NAME_LEN};
pub use pattern::UserAssignmentPattern;
pub use transaction::{Transaction, MAX_DESCRIPTION_LEN};

#[cfg(test)]
mod tests;
