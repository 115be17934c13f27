//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`DomainError`] into Actix responses here. Every error body uses the
//! same envelope shape as success responses: `{"status": "error",
//! "message": ...}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::TraceId;
use crate::middleware::trace::TRACE_ID_HEADER;

/// Error carried through HTTP handlers, rendered as the error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any
    /// ambient trace identifier.
    #[must_use]
    pub fn from_domain(error: DomainError) -> Self {
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Shortcut for a validation failure.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::from_domain(DomainError::invalid_request(message))
    }

    /// Shortcut for a missing-resource failure.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_domain(DomainError::not_found(message))
    }

    /// Shortcut for an authentication failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::from_domain(DomainError::unauthorized(message))
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    const fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest | ErrorCode::StorageFailure => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            // Concurrency anomalies and database failures both surface as
            // internal failures to the caller.
            ErrorCode::Conflict | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Serialised error envelope body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Log the detail, leak nothing past the envelope.
            error!(code = ?self.code, message = %self.message, "internal error response");
            return builder.json(ErrorBody {
                status: "error",
                message: "Internal server error",
            });
        }
        builder.json(ErrorBody {
            status: "error",
            message: &self.message,
        })
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
