//! Error handling - RFC 7807 responses plus the redirect semantics.
//!
//! Denied mutations and missing authentication are not hard errors at this
//! edge: they surface as `303 See Other` toward a safe fallback view (the
//! post's detail page, or the login entry point).

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use quill_shared::response::{ErrorResponse, InvalidField};
use std::fmt;

use crate::handlers::destination_path;

/// Application-level error type that converts to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    /// Recoverable denial: send the caller somewhere safe instead of
    /// an error page.
    Redirect(String),
    Conflict(String),
    Internal(String),
    Validation(Vec<InvalidField>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::Unauthorized => write!(f, "unauthorized"),
            AppError::Redirect(to) => write!(f, "redirected to {to}"),
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
            AppError::Validation(fields) => write!(f, "validation failed: {} fields", fields.len()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Redirect(_) => StatusCode::SEE_OTHER,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Redirect(to) = self {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, to.clone()))
                .finish();
        }

        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                ErrorResponse::internal_error()
            }
            AppError::Validation(fields) => ErrorResponse::validation_failed(fields.clone()),
            AppError::Redirect(_) => unreachable!(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<quill_core::DomainError> for AppError {
    fn from(err: quill_core::DomainError) -> Self {
        use quill_core::DomainError;
        use quill_core::services::Destination;

        match err {
            DomainError::NotFound { what } => AppError::NotFound(what.to_string()),
            DomainError::Forbidden { fallback } => {
                AppError::Redirect(destination_path(&fallback))
            }
            DomainError::Unauthenticated => {
                AppError::Redirect(destination_path(&Destination::Login))
            }
            DomainError::Validation(errors) => AppError::Validation(
                errors
                    .into_iter()
                    .map(|e| InvalidField {
                        field: e.field.to_string(),
                        message: e.message,
                    })
                    .collect(),
            ),
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<quill_core::error::RepoError> for AppError {
    fn from(err: quill_core::error::RepoError) -> Self {
        use quill_core::error::RepoError;

        match err {
            RepoError::NotFound => AppError::NotFound("resource".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("database error: {msg}");
                AppError::Internal("database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
