//! Stable error taxonomy shared across the store, tools, and gateway.
//!
//! Wire codes are defined once here so the Gateway's JSON error body and
//! the store/tool-level error types never drift apart.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Wire-stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    InvalidArgument,
    Forbidden,
    NotReady,
    BadState,
    ApprovalRequired,
    Expired,
    Mismatch,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotReady => StatusCode::CONFLICT,
            ErrorCode::BadState => StatusCode::CONFLICT,
            ErrorCode::ApprovalRequired => StatusCode::PRECONDITION_REQUIRED,
            ErrorCode::Expired => StatusCode::GONE,
            ErrorCode::Mismatch => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

}

/// Error surfaced by the CP Store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found")]
    NotFound,

    #[error("bad state: {0}")]
    BadState(String),

    #[error("plan hash mismatch")]
    HashMismatch,

    #[error("approval expired")]
    Expired,

    #[error("unknown approval token")]
    Unknown,

    #[error("approval bound to a different plan")]
    Mismatch,

    #[error("job lease was preempted")]
    Preempted,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed JSON in store row: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            StoreError::NotFound => ErrorCode::NotFound,
            StoreError::BadState(_) => ErrorCode::BadState,
            StoreError::HashMismatch => ErrorCode::Mismatch,
            StoreError::Expired => ErrorCode::Expired,
            StoreError::Unknown => ErrorCode::NotFound,
            StoreError::Mismatch => ErrorCode::Mismatch,
            StoreError::Preempted => ErrorCode::BadState,
            StoreError::Database(_) => ErrorCode::Internal,
            StoreError::Json(_) => ErrorCode::Internal,
        }
    }
}

/// Error returned by a tool handler's dispatch contract.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("path escapes allowed roots: {0}")]
    PathEscape(String),

    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error("state conflict: {0}")]
    StateConflict(String),

    #[error("plan drift detected")]
    PlanDrift,
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::ExecutionFailed(err.to_string())
    }
}

/// Top-level error surfaced by the Gateway's HTTP handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("result not ready")]
    NotReady,

    #[error("bad state: {0}")]
    BadState(String),

    #[error("approval required")]
    ApprovalRequired,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Unauthorized => ErrorCode::Unauthorized,
            GatewayError::NotFound => ErrorCode::NotFound,
            GatewayError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            GatewayError::Forbidden(_) => ErrorCode::Forbidden,
            GatewayError::NotReady => ErrorCode::NotReady,
            GatewayError::BadState(_) => ErrorCode::BadState,
            GatewayError::ApprovalRequired => ErrorCode::ApprovalRequired,
            GatewayError::Store(e) => e.code(),
            GatewayError::Internal(_) => ErrorCode::Internal,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorCode,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = ErrorBody {
            error: self.to_string(),
            code,
        };
        (code.status(), Json(body)).into_response()
    }
}
