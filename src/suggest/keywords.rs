use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::{fuzzy, normalize, SuggestionResult, SuggestionSource};
use crate::models::Category;

/// One slug of the keyword dictionary: the category display name it
/// resolves to and the keywords that trigger it, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeywordEntry {
    pub(crate) slug: String,
    pub(crate) name: String,
    pub(crate) keywords: Vec<String>,
}

impl KeywordEntry {
    pub(crate) fn new(slug: &str, name: &str, keywords: &[&str]) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Immutable slug → keywords dictionary. Entry order is match order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeywordDictionary {
    entries: Vec<KeywordEntry>,
}

const SEED: &[(&str, &str, &[&str])] = &[
    (
        "food-dining",
        "Food & Dining",
        &[
            "starbucks", "coffee", "cafe", "restaurant", "mcdonalds", "burger", "pizza", "food",
            "lunch", "dinner", "breakfast", "dine", "eating", "meal", "wendys", "subway",
            "chipotle", "panera",
        ],
    ),
    (
        "groceries",
        "Groceries",
        &[
            "groceries", "grocery", "supermarket", "walmart", "target", "safeway", "kroger",
            "whole foods", "trader joes", "costco", "market",
        ],
    ),
    (
        "transport",
        "Transport",
        &[
            "uber", "lyft", "taxi", "gas", "gasoline", "fuel", "parking", "transit", "metro",
            "subway", "bus", "train", "shell", "exxon", "chevron", "bp",
        ],
    ),
    (
        "shopping",
        "Shopping",
        &[
            "amazon", "target", "walmart", "mall", "store", "shopping", "clothes", "clothing",
            "ebay", "etsy", "best buy",
        ],
    ),
    (
        "entertainment",
        "Entertainment",
        &[
            "netflix", "spotify", "hulu", "movie", "cinema", "theater", "theatre", "concert",
            "game", "gaming", "xbox", "playstation", "steam", "disney",
        ],
    ),
    ("rent", "Rent", &["rent", "mortgage", "housing", "landlord", "lease"]),
    (
        "utilities",
        "Utilities",
        &[
            "electric", "electricity", "water", "gas", "internet", "wifi", "phone", "utility",
            "bill", "verizon", "at&t", "comcast", "spectrum",
        ],
    ),
    (
        "health",
        "Health",
        &[
            "doctor", "pharmacy", "hospital", "clinic", "medicine", "health", "medical",
            "dentist", "cvs", "walgreens", "prescription",
        ],
    ),
    (
        "education",
        "Education",
        &[
            "school", "university", "college", "course", "tuition", "textbook", "book",
            "education", "udemy", "coursera",
        ],
    ),
    (
        "salary",
        "Salary",
        &["salary", "paycheck", "wages", "payroll", "income", "employer"],
    ),
    (
        "freelance",
        "Freelance",
        &["freelance", "consulting", "contract", "gig", "upwork", "fiverr"],
    ),
    (
        "investment",
        "Investment",
        &[
            "investment", "dividend", "stocks", "bonds", "interest", "capital gain", "etrade",
            "robinhood",
        ],
    ),
    (
        "gift",
        "Gift",
        &["gift", "birthday", "holiday", "present", "donation received"],
    ),
];

impl KeywordDictionary {
    /// Build a dictionary, rejecting anything the matcher could silently
    /// mis-handle: bad or duplicate slugs, empty names, empty keyword lists,
    /// and keywords that are not already normalized.
    pub(crate) fn new(entries: Vec<KeywordEntry>) -> Result<Self> {
        let slug_re = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").context("Invalid slug regex")?;
        let mut seen = HashSet::new();

        for entry in &entries {
            if !slug_re.is_match(&entry.slug) {
                anyhow::bail!("Invalid keyword slug '{}'", entry.slug);
            }
            if !seen.insert(entry.slug.as_str()) {
                anyhow::bail!("Duplicate keyword slug '{}'", entry.slug);
            }
            if entry.name.trim().is_empty() {
                anyhow::bail!("Keyword slug '{}' has no category name", entry.slug);
            }
            if entry.keywords.is_empty() {
                anyhow::bail!("Keyword slug '{}' has no keywords", entry.slug);
            }
            for keyword in &entry.keywords {
                if keyword.is_empty() {
                    anyhow::bail!("Keyword slug '{}' has an empty keyword", entry.slug);
                }
                if normalize(keyword) != *keyword {
                    anyhow::bail!(
                        "Keyword '{keyword}' in slug '{}' must be lowercase and trimmed",
                        entry.slug
                    );
                }
            }
        }

        Ok(Self { entries })
    }

    /// The built-in dictionary, aligned with the default category names.
    pub(crate) fn seed() -> Self {
        let entries = SEED
            .iter()
            .map(|(slug, name, keywords)| KeywordEntry::new(slug, name, keywords))
            .collect();
        Self { entries }
    }

    /// Load a dictionary from a CSV file with a `slug,name,keywords` header.
    pub(crate) fn from_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open keyword file: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Invalid keyword file: {}", path.display()))
    }

    /// Rows become entries in file order. Keywords are `;`-separated; an
    /// empty slug is derived from the name.
    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().context("Failed to read CSV header")?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let slug_col = column("slug");
        let name_col = column("name").ok_or_else(|| anyhow::anyhow!("Missing 'name' column"))?;
        let keywords_col =
            column("keywords").ok_or_else(|| anyhow::anyhow!("Missing 'keywords' column"))?;

        let mut entries = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Row {}: malformed record", i + 1))?;
            let name = record.get(name_col).unwrap_or_default().to_string();
            let slug = match slug_col.and_then(|c| record.get(c)) {
                Some(s) if !s.is_empty() => s.to_string(),
                _ => slugify(&name),
            };
            let keywords = record
                .get(keywords_col)
                .unwrap_or_default()
                .split(';')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            entries.push(KeywordEntry {
                slug,
                name,
                keywords,
            });
        }

        Self::new(entries)
    }

    pub(crate) fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::seed()
    }
}

/// Turn a category display name into a dictionary slug.
/// e.g. `"Food & Dining"` → `"food-dining"`
pub(crate) fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace('&', "")
        .split_whitespace()
        .flat_map(|word| word.split('-'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Match a description against every dictionary slug, in dictionary order.
///
/// The first matching keyword of a slug decides it; the slug surfaces only
/// if a category with exactly the slug's display name exists and has not
/// been emitted already.
pub(crate) fn match_keywords<'a>(
    description: &str,
    dictionary: &KeywordDictionary,
    categories: &'a [Category],
    fuzzy_threshold: usize,
) -> Vec<SuggestionResult<'a>> {
    let normalized = normalize(description);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut seen = HashSet::new();

    for entry in dictionary.entries() {
        let hit = entry
            .keywords
            .iter()
            .any(|keyword| fuzzy::matches_keyword(&normalized, keyword, fuzzy_threshold));
        if !hit {
            continue;
        }

        let Some(category) = categories.iter().find(|c| c.name == entry.name) else {
            continue;
        };
        let Some(id) = category.id else {
            continue;
        };
        if seen.insert(id) {
            matches.push(SuggestionResult {
                category,
                source: SuggestionSource::Keyword,
            });
        }
    }

    matches
}

#[cfg(test)]
#[path = "keywords_tests.rs"]
mod tests;
