//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{error_codes, AccountError, ErrorResponse};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the account-specific error taxonomy
    #[error(transparent)]
    Account(#[from] AccountError),
}

pub type DomainResult<T> = Result<T, DomainError>;
