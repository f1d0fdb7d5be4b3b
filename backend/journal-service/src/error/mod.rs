use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for JournalError {
    fn from(errors: validator::ValidationErrors) -> Self {
        JournalError::Validation(errors.to_string())
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
}

impl JournalError {
    fn kind(&self) -> (&'static str, &'static str) {
        match self {
            JournalError::Database(_) | JournalError::Migration(_) => {
                ("server_error", "DATABASE_ERROR")
            }
            JournalError::Config(_) | JournalError::Internal(_) => {
                ("server_error", "INTERNAL_SERVER_ERROR")
            }
            JournalError::Validation(_) => ("validation_error", "VALIDATION_ERROR"),
            JournalError::BadRequest(_) => ("validation_error", "INVALID_REQUEST"),
            JournalError::EntryNotFound(_) => ("not_found_error", "ENTRY_NOT_FOUND"),
            JournalError::Unauthorized(_) => ("authentication_error", "UNAUTHORIZED"),
        }
    }
}

impl ResponseError for JournalError {
    fn status_code(&self) -> StatusCode {
        match self {
            JournalError::Database(_)
            | JournalError::Migration(_)
            | JournalError::Config(_)
            | JournalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            JournalError::Validation(_) | JournalError::BadRequest(_) => StatusCode::BAD_REQUEST,
            JournalError::EntryNotFound(_) => StatusCode::NOT_FOUND,
            JournalError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (error_type, code) = self.kind();

        // Server-side failures are logged here; the client only sees a generic message.
        let message = match self {
            JournalError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database operation failed".to_string()
            }
            JournalError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                "Database operation failed".to_string()
            }
            JournalError::Config(e) | JournalError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message,
            status: status.as_u16(),
            error_type: error_type.to_string(),
            code: code.to_string(),
        };

        HttpResponse::build(status).json(body)
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;

/// Failure of the model-backed classification path.
///
/// Never surfaced to API callers; the classifier falls back to the keyword heuristic.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("Sentiment model disabled")]
    ModelDisabled,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Inference timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClassifierError {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierError::ModelDisabled => "disabled",
            ClassifierError::ModelNotFound(_) => "model_not_found",
            ClassifierError::Tokenizer(_) => "tokenizer",
            ClassifierError::OnnxRuntime(_) => "onnx_runtime",
            ClassifierError::MalformedOutput(_) => "malformed_output",
            ClassifierError::Timeout(_) => "timeout",
            ClassifierError::Internal(_) => "internal",
        }
    }
}
