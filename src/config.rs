use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

use crate::suggest::{KeywordDictionary, SuggestConfig};

const DATA_DIR_VAR: &str = "SMARTBUDGET_DATA_DIR";
const KEYWORDS_VAR: &str = "SMARTBUDGET_KEYWORDS";
const FUZZY_THRESHOLD_VAR: &str = "SMARTBUDGET_FUZZY_THRESHOLD";
const MIN_COUNT_VAR: &str = "SMARTBUDGET_MIN_COUNT";

pub(crate) const DB_FILE: &str = "smartbudget.db";
pub(crate) const KEYWORDS_FILE: &str = "keywords.csv";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    /// Dictionary override; `None` means the built-in seed.
    pub(crate) keywords_path: Option<PathBuf>,
    pub(crate) suggest: SuggestConfig,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    fn from_env(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match get(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => directories::ProjectDirs::from("com", "smartbudget", "SmartBudget")
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
                .data_dir()
                .to_path_buf(),
        };

        let keywords_path = match get(KEYWORDS_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(data_dir.join(KEYWORDS_FILE)).filter(|p| p.exists()),
        };

        let defaults = SuggestConfig::default();
        let suggest = SuggestConfig {
            fuzzy_threshold: parse_var(&get, FUZZY_THRESHOLD_VAR)?
                .unwrap_or(defaults.fuzzy_threshold),
            min_count: parse_var(&get, MIN_COUNT_VAR)?.unwrap_or(defaults.min_count),
        };

        Ok(Self {
            db_path: data_dir.join(DB_FILE),
            data_dir,
            keywords_path,
            suggest,
        })
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })
    }

    pub(crate) fn load_dictionary(&self) -> Result<KeywordDictionary> {
        match &self.keywords_path {
            Some(path) => {
                let dictionary = KeywordDictionary::from_csv(path)?;
                tracing::info!(
                    path = %path.display(),
                    slugs = dictionary.len(),
                    "loaded keyword dictionary"
                );
                Ok(dictionary)
            }
            None => Ok(KeywordDictionary::seed()),
        }
    }
}

fn parse_var<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} must be a non-negative integer, got '{raw}'")),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
