//! Runtime configuration resolved from the process environment.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TODOS_DB_PATH` | SQLite database file | `<temp dir>/todos.db` |
//! | `TODOS_LOG_LEVEL` | `trace`..`error` | [`default_log_level`] |
//! | `TODOS_LOG_DIR` | absolute log directory | unset: file logging off |
//!
//! Blank values are treated as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TODOS_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODOS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODOS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "todos.db";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodosConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl TodosConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
