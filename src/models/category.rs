#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Longest category name the CRUD layer accepts.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub category_type: CategoryType,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Category {
    pub fn new(name: String, category_type: CategoryType) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            name,
            category_type,
            icon: String::new(),
            color: String::new(),
            is_default: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.trim().to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Categories seeded into an empty database: (name, type, icon, color).
pub const DEFAULT_CATEGORIES: &[(&str, CategoryType, &str, &str)] = &[
    ("Salary", CategoryType::Income, "DollarSign", "#10b981"),
    ("Freelance", CategoryType::Income, "Briefcase", "#10b981"),
    ("Investment", CategoryType::Income, "TrendingUp", "#10b981"),
    ("Gift", CategoryType::Income, "Gift", "#10b981"),
    ("Other Income", CategoryType::Income, "Plus", "#10b981"),
    ("Food & Dining", CategoryType::Expense, "Utensils", "#f59e0b"),
    ("Groceries", CategoryType::Expense, "ShoppingCart", "#14b8a6"),
    ("Transport", CategoryType::Expense, "Car", "#3b82f6"),
    ("Shopping", CategoryType::Expense, "ShoppingBag", "#8b5cf6"),
    ("Entertainment", CategoryType::Expense, "Film", "#ec4899"),
    ("Rent", CategoryType::Expense, "Home", "#ef4444"),
    ("Utilities", CategoryType::Expense, "Zap", "#f97316"),
    ("Health", CategoryType::Expense, "Heart", "#10b981"),
    ("Education", CategoryType::Expense, "BookOpen", "#6366f1"),
    ("Other Expense", CategoryType::Expense, "Tag", "#6b7280"),
];
