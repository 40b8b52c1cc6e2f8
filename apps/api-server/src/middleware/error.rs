//! Error handling - maps every failure to a plain-text server error.
//!
//! All failures, whatever their kind, answer `500 Internal Server Error` with
//! the error description as a `text/plain` body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use std::fmt;

use quill_core::error::{DomainError, RepoError};

/// Application-level error type returned by handlers.
#[derive(Debug)]
pub enum AppError {
    /// A request parameter could not be understood.
    BadRequest(String),
    Domain(DomainError),
    Repository(RepoError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Domain(err) => write!(f, "{}", err),
            AppError::Repository(err) => write!(f, "{}", err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Repository(err) if err.is_persistence() => {
                tracing::error!(error = %err, "Post store error");
            }
            AppError::Repository(err) => tracing::warn!(error = %err, "Post lookup failed"),
            AppError::Domain(err) => tracing::debug!(error = %err, "Rejected request"),
            AppError::BadRequest(msg) => tracing::debug!(error = %msg, "Rejected request"),
        }

        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Domain(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Repository(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
