//! Runtime configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "rhythm-ledger.sqlite";
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,app::ledger=debug,app::db=info";

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,

    /// Items per page for played-track history and liked tracks
    pub page_size: usize,

    /// Upper bound for a single request in the command layer
    pub query_timeout: Duration,

    /// Directory for rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,

    /// Fallback filter directives when `RUST_LOG` is not set
    pub log_directives: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            log_dir: None,
            log_directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `LEDGER_DB_PATH` (default: rhythm-ledger.sqlite)
    /// - `LEDGER_PAGE_SIZE` (default: 5, zero is ignored)
    /// - `LEDGER_QUERY_TIMEOUT_MS` (default: 5000)
    /// - `LEDGER_LOG_DIR` (default: unset)
    /// - `LEDGER_LOG` (default: info,app::ledger=debug,app::db=info)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            db_path: lookup("LEDGER_DB_PATH")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            page_size: lookup("LEDGER_PAGE_SIZE")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),

            query_timeout: lookup("LEDGER_QUERY_TIMEOUT_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.query_timeout),

            log_dir: lookup("LEDGER_LOG_DIR")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),

            log_directives: lookup("LEDGER_LOG")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.log_directives),
        }
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}
