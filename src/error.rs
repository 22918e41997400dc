use rusqlite;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("record conflict: {message}")]
    Conflict { message: String },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        details: Option<JsonValue>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            source: None,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::conflict", %message, "conflict error");
        AppError::Conflict { message }
    }

    /// A keyed record the caller required is absent. For the ledger this is a
    /// data-integrity failure (an attempt references a missing track, detail
    /// or answer sheet), never an empty result.
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        let key = key.to_string();
        warn!(target: "app::database", entity, %key, "resource not found");
        AppError::NotFound { entity, key }
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::database", %message, "database error");
        AppError::Database { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::{QueryReturnedNoRows, SqliteFailure};
        use rusqlite::ErrorCode;

        match &error {
            QueryReturnedNoRows => AppError::not_found("record", "query returned no rows"),
            SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                AppError::conflict("unique or foreign key constraint violated")
            }
            _ => {
                error!(target: "app::database", error = ?error, "sqlite error");
                AppError::database(error.to_string())
            }
        }
    }
}
