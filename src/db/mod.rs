use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

pub mod migrations;

pub mod repositories;

#[derive(Clone, Debug)]
pub struct DbPool {
    path: PathBuf,
}

impl DbPool {
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        info!(target: "app::db", db_path = %path.display(), "initializing database pool");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool = Self { path };
        {
            pool.get_connection()?;
        }

        Ok(pool)
    }

    pub fn get_connection(&self) -> AppResult<Connection> {
        let mut conn = Connection::open(&self.path)?;
        configure_connection(&mut conn)?;
        migrations::run(&conn)?;
        debug!(target: "app::db", db_path = %self.path.display(), "database connection ready");
        Ok(conn)
    }

    pub fn with_connection<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.get_connection()?;
        callback(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn configure_connection(conn: &mut Connection) -> AppResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", &1)?;
    conn.pragma_update(None, "journal_mode", &"WAL")?;
    Ok(())
}

/// Stored timestamps are fixed-width UTC with millisecond precision, so string
/// comparison in SQL agrees with chronological order.
pub fn to_db_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_db_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| AppError::database(format!("invalid stored timestamp {raw:?}: {err}")))
}
