use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures raised by the ledger and its persistence store.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller input rejected before any mutation
    #[error("validation error: {0}")]
    Validation(String),

    /// Part of the error taxonomy; removing an unknown id is a silent no-op
    /// and never raises it.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored record could not be decoded
    #[error("corrupt stored record '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(message) => Self::bad_request(message),
            LedgerError::NotFound(what) => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("not found: {what}"),
            },
            other => Self::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
