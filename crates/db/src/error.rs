//! Errors raised by the accounting repositories.

use partida_core::posting::PostingError;
use sea_orm::{DbErr, SqlErr};

/// Error types for accounting operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountingError {
    /// Business or validation failure from the posting domain.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccountingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Posting(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Posting(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the whole operation may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Posting(err) => err.is_retryable(),
            Self::Database(_) => true,
        }
    }

    /// Flattens into the domain error, keeping database failures retryable.
    #[must_use]
    pub fn into_posting(self) -> PostingError {
        match self {
            Self::Posting(err) => err,
            Self::Database(err) => PostingError::Database(err.to_string()),
        }
    }
}

/// Returns true if `err` is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
