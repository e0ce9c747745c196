//! Archive configuration.
//!
//! Precedence: environment > config file > defaults.

use crate::errors::ArchiveError;
use crate::query::DEFAULT_SORT_FIELD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Extra attempts a store transaction makes after a collision.
    pub transaction_retries: u32,
    /// Secondary sort key for compiled article queries.
    pub default_sort_field: String,
    pub max_query_results: usize,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            transaction_retries: 3,
            default_sort_field: DEFAULT_SORT_FIELD.to_string(),
            max_query_results: 10_000,
            log_dir: None,
            log_level: None,
        }
    }
}

impl ArchiveConfig {
    /// # Errors
    /// Returns `Config` if the text is not valid TOML for this struct.
    pub fn from_toml_str(s: &str) -> Result<Self, ArchiveError> {
        toml::from_str(s).map_err(|e| ArchiveError::Config(e.to_string()))
    }

    /// Load `path` (if given and present), then apply `ARCHIVE_*` overrides.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if an override variable holds an unparsable number.
    pub fn load(path: Option<&Path>) -> Result<Self, ArchiveError> {
        let mut cfg = match path {
            Some(p) if p.exists() => Self::from_toml_str(&std::fs::read_to_string(p)?)?,
            _ => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Apply overrides from a variable lookup (the process env in `load`).
    ///
    /// # Errors
    /// Returns `Config` when a numeric variable does not parse.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ArchiveError> {
        fn parse<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ArchiveError> {
            raw.trim().parse().map_err(|_| ArchiveError::Config(format!("{name}={raw:?} is not a number")))
        }
        if let Some(v) = lookup("ARCHIVE_TXN_RETRIES") {
            self.transaction_retries = parse("ARCHIVE_TXN_RETRIES", &v)?;
        }
        if let Some(v) = lookup("ARCHIVE_MAX_QUERY_RESULTS") {
            self.max_query_results = parse("ARCHIVE_MAX_QUERY_RESULTS", &v)?;
        }
        if let Some(v) = lookup("ARCHIVE_DEFAULT_SORT_FIELD") {
            self.default_sort_field = v;
        }
        if let Some(v) = lookup("ARCHIVE_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("ARCHIVE_LOG_LEVEL") {
            self.log_level = Some(v);
        }
        Ok(())
    }
}
