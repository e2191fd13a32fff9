mod fuzzy;
mod keywords;

use std::collections::HashSet;

use crate::models::{Category, Transaction, UserAssignmentPattern};

pub(crate) use keywords::{match_keywords, KeywordDictionary};

/// Hard cap on suggestions per description, whichever source answers.
pub(crate) const MAX_SUGGESTIONS: usize = 3;

/// Canonical form of a description for keyword matching and pattern keys.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuggestionSource {
    Keyword,
    Learned,
}

impl SuggestionSource {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Learned => "learned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SuggestionResult<'a> {
    pub(crate) category: &'a Category,
    pub(crate) source: SuggestionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SuggestConfig {
    /// Max edit distance between a description word and a keyword.
    pub(crate) fuzzy_threshold: usize,
    /// Observations needed before a learned pattern is trusted.
    pub(crate) min_count: u32,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 2,
            min_count: 3,
        }
    }
}

/// Categories the user has filed this exact (normalized) description under
/// at least `min_count` times, most frequent first. Equal counts keep their
/// input order.
pub(crate) fn find_learned_patterns<'a>(
    description: &str,
    patterns: &[UserAssignmentPattern],
    categories: &'a [Category],
    min_count: u32,
) -> Vec<SuggestionResult<'a>> {
    let normalized = normalize(description);
    if normalized.is_empty() || patterns.is_empty() {
        return Vec::new();
    }

    let mut matching: Vec<&UserAssignmentPattern> = patterns
        .iter()
        .filter(|p| p.description == normalized && p.count >= min_count)
        .collect();
    matching.sort_by(|a, b| b.count.cmp(&a.count));

    let mut results = Vec::new();
    let mut seen = HashSet::new();
    for pattern in matching {
        let Some(category) = Category::find_by_id(categories, pattern.category_id) else {
            continue;
        };
        if seen.insert(pattern.category_id) {
            results.push(SuggestionResult {
                category,
                source: SuggestionSource::Learned,
            });
        }
    }

    results
}

/// Proposes categories for free-text descriptions.
///
/// Learned patterns win outright: if any qualify, keywords are never
/// consulted for that description. The two sources are never mixed.
#[derive(Debug, Clone, Default)]
pub(crate) struct Suggester {
    dictionary: KeywordDictionary,
    config: SuggestConfig,
}

impl Suggester {
    pub(crate) fn new(dictionary: KeywordDictionary, config: SuggestConfig) -> Self {
        Self { dictionary, config }
    }

    pub(crate) fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    pub(crate) fn config(&self) -> SuggestConfig {
        self.config
    }

    /// Up to [`MAX_SUGGESTIONS`] categories for `description`.
    pub(crate) fn suggest<'a>(
        &self,
        description: &str,
        categories: &'a [Category],
        patterns: &[UserAssignmentPattern],
    ) -> Vec<&'a Category> {
        self.suggest_detailed(description, categories, patterns)
            .into_iter()
            .map(|s| s.category)
            .collect()
    }

    /// Like [`Suggester::suggest`] but keeps the source tag.
    pub(crate) fn suggest_detailed<'a>(
        &self,
        description: &str,
        categories: &'a [Category],
        patterns: &[UserAssignmentPattern],
    ) -> Vec<SuggestionResult<'a>> {
        if normalize(description).is_empty() {
            return Vec::new();
        }

        let learned =
            find_learned_patterns(description, patterns, categories, self.config.min_count);
        let mut results = if learned.is_empty() {
            match_keywords(
                description,
                &self.dictionary,
                categories,
                self.config.fuzzy_threshold,
            )
        } else {
            learned
        };
        results.truncate(MAX_SUGGESTIONS);

        tracing::debug!(
            description,
            source = results.first().map(|r| r.source.as_str()),
            count = results.len(),
            "suggested categories"
        );
        results
    }

    /// Fill in the category of every uncategorized transaction with its top
    /// suggestion. Existing assignments are left alone. Returns how many
    /// transactions were categorized.
    pub(crate) fn categorize_batch(
        &self,
        transactions: &mut [Transaction],
        categories: &[Category],
        patterns: &[UserAssignmentPattern],
    ) -> usize {
        let mut count = 0;
        for txn in transactions.iter_mut() {
            if txn.category_id.is_some() {
                continue;
            }
            if let Some(top) = self.suggest(&txn.description, categories, patterns).first() {
                txn.category_id = top.id;
                count += 1;
            }
        }
        count
    }
}
