pub mod ledger;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::config::LedgerConfig;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::calendar_service::CalendarService;
use crate::services::history_service::HistoryService;
use crate::services::like_service::LikeService;
use crate::services::rank_engine::RankEngine;
use crate::services::timeline_service::TimelineService;

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    query_timeout: Duration,
    history_service: Arc<HistoryService>,
    timeline_service: Arc<TimelineService>,
    calendar_service: Arc<CalendarService>,
    rank_engine: Arc<RankEngine>,
    like_service: Arc<LikeService>,
}

impl AppState {
    pub fn new(config: &LedgerConfig) -> AppResult<Self> {
        let db_pool = DbPool::new(&config.db_path)?;
        Ok(Self::with_pool(db_pool, config))
    }

    pub fn with_pool(db_pool: DbPool, config: &LedgerConfig) -> Self {
        let history_service = Arc::new(HistoryService::new(db_pool.clone(), config.page_size));
        let timeline_service = Arc::new(TimelineService::new(db_pool.clone()));
        let calendar_service = Arc::new(CalendarService::new(db_pool.clone()));
        let rank_engine = Arc::new(RankEngine::new(db_pool.clone()));
        let like_service = Arc::new(LikeService::new(db_pool.clone(), config.page_size));

        Self {
            db_pool,
            query_timeout: config.query_timeout,
            history_service,
            timeline_service,
            calendar_service,
            rank_engine,
            like_service,
        }
    }

    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history_service)
    }

    pub fn timeline(&self) -> Arc<TimelineService> {
        Arc::clone(&self.timeline_service)
    }

    pub fn calendar(&self) -> Arc<CalendarService> {
        Arc::clone(&self.calendar_service)
    }

    pub fn ranking(&self) -> Arc<RankEngine> {
        Arc::clone(&self.rank_engine)
    }

    pub fn likes(&self) -> Arc<LikeService> {
        Arc::clone(&self.like_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    /// HTTP-equivalent status for transports that need one.
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        status: u16,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            status,
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", 400, message, details),
            AppError::NotFound { entity, key } => {
                warn!(target: "app::command", entity, %key, "not found in command");
                CommandError::new(
                    "NOT_FOUND",
                    404,
                    format!("{entity} not found: {key}"),
                    Some(serde_json::json!({ "entity": entity, "key": key })),
                )
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", 409, message, None),
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("UNKNOWN", 500, message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", 500, "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", 500, "filesystem access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", 500, message, None)
            }
        }
    }
}

/// Runs a blocking service call on the blocking pool, bounded by `limit`.
///
/// The limit bounds how long the caller waits, not the work itself: a
/// blocking task cannot be aborted, so a timed-out query runs to completion
/// on the blocking pool and holds its SQLite connection until then. Its
/// result is discarded.
pub(crate) async fn run_blocking<T: Send + 'static>(
    limit: Duration,
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(task)).await {
        Ok(joined) => joined
            .map_err(|err| {
                error!(target: "app::command", error = %err, "ledger task panicked or was cancelled");
                CommandError::new("UNKNOWN", 500, format!("ledger task failed: {err}"), None)
            })?
            .map_err(CommandError::from),
        Err(_) => {
            let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            warn!(target: "app::command", limit_ms, "ledger query timed out");
            Err(CommandError::new(
                "TIMEOUT",
                504,
                format!("query exceeded {limit_ms} ms"),
                Some(serde_json::json!({ "limitMs": limit_ms })),
            ))
        }
    }
}
