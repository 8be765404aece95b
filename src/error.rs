//! Unified service error type
//!
//! One enum covers the whole failure taxonomy so handlers and db functions
//! can propagate with `?`. Error responses carry a single `error` message
//! string; database errors are logged at the response boundary and surface
//! as 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Service error taxonomy
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input: bad size format, bad scan record, bad quantity
    #[error("{0}")]
    Validation(String),
    /// Unknown plate or non-pending batch id
    #[error("{0}")]
    NotFound(String),
    /// Duplicate pallet id
    #[error("{0}")]
    Conflict(String),
    /// Manual withdrawal exceeding current stock
    #[error("{0}")]
    InsufficientStock(String),
    /// Persistence failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for handler results
pub type ApiResult<T> = Result<Json<T>, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        Self::InsufficientStock(msg.into())
    }

    /// HTTP status for this error. Duplicate pallet ids and stock shortfalls
    /// surface as 400 like any other rejected input.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) | Self::InsufficientStock(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Database(ref e) = self {
            tracing::error!(error = %e, "database error");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
