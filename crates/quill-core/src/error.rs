//! Domain-level error types.

use thiserror::Error;

use crate::services::Destination;
use crate::validate::FieldError;

/// Domain errors - business rule failures surfaced to callers.
///
/// A hidden post and a missing post are deliberately the same `NotFound`:
/// the error must never reveal that a record exists behind the visibility
/// rule.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{what} not found")]
    NotFound { what: &'static str },

    /// The viewer is authenticated but does not own the record. Carries the
    /// view the caller should be sent to instead of an error page.
    #[error("forbidden")]
    Forbidden { fallback: Destination },

    /// No identity present where one is required.
    #[error("authentication required")]
    Unauthenticated,

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound { what }
    }
}

/// Storage-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("row not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}
