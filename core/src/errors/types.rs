//! Account-credential error taxonomy
//!
//! Internal variants are precise; the messages surfaced to end users go
//! through [`AccountError::user_message`], which deliberately collapses
//! account-state details into generic wording so that failures cannot be
//! used to enumerate accounts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the credential services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("Account is not eligible for an email change")]
    AccountNotEligible,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Email address already in use")]
    EmailAlreadyInUse,

    #[error("Rate limit exceeded, retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: i64 },

    #[error("Invalid confirmation token")]
    InvalidToken,

    #[error("Confirmation token expired")]
    TokenExpired,
}

/// Stable error codes for programmatic handling
pub mod error_codes {
    pub const ACCOUNT_NOT_FOUND: &str = "ACCOUNT_NOT_FOUND";
    pub const EMAIL_NOT_CONFIRMED: &str = "EMAIL_NOT_CONFIRMED";
    pub const ACCOUNT_NOT_ELIGIBLE: &str = "ACCOUNT_NOT_ELIGIBLE";
    pub const INVALID_CREDENTIAL: &str = "INVALID_CREDENTIAL";
    pub const INVALID_EMAIL_FORMAT: &str = "INVALID_EMAIL_FORMAT";
    pub const EMAIL_ALREADY_IN_USE: &str = "EMAIL_ALREADY_IN_USE";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const INVALID_TOKEN: &str = "INVALID_TOKEN";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
}

impl AccountError {
    /// Stable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::AccountNotFound => error_codes::ACCOUNT_NOT_FOUND,
            AccountError::EmailNotConfirmed => error_codes::EMAIL_NOT_CONFIRMED,
            AccountError::AccountNotEligible => error_codes::ACCOUNT_NOT_ELIGIBLE,
            AccountError::InvalidCredential => error_codes::INVALID_CREDENTIAL,
            AccountError::InvalidEmailFormat => error_codes::INVALID_EMAIL_FORMAT,
            AccountError::EmailAlreadyInUse => error_codes::EMAIL_ALREADY_IN_USE,
            AccountError::RateLimited { .. } => error_codes::RATE_LIMITED,
            AccountError::InvalidToken => error_codes::INVALID_TOKEN,
            AccountError::TokenExpired => error_codes::TOKEN_EXPIRED,
        }
    }

    /// Message safe to show to the end user.
    ///
    /// `AccountNotFound` and `InvalidCredential` share one generic message;
    /// distinguishing them would leak which accounts exist. `RateLimited` is
    /// the only variant carrying structured data the user must see verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AccountError::AccountNotFound | AccountError::InvalidCredential => {
                "Invalid credentials.".to_string()
            }
            AccountError::EmailNotConfirmed => {
                "Email has not been confirmed, please click the link in the email we sent you."
                    .to_string()
            }
            AccountError::AccountNotEligible => {
                "Cannot update the email for an unconfirmed address.".to_string()
            }
            AccountError::InvalidEmailFormat => "Invalid email format.".to_string(),
            AccountError::EmailAlreadyInUse => {
                "Email already exists, please choose a unique email.".to_string()
            }
            AccountError::RateLimited { retry_after_secs } => format!(
                "The rate limit for sending confirmation emails has been exceeded, please try again in {} seconds.",
                retry_after_secs
            ),
            AccountError::InvalidToken => "Could not update your email.".to_string(),
            AccountError::TokenExpired => "Confirmation link has expired.".to_string(),
        }
    }
}

/// Unified error response structure for the presentation layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// User-safe message
    pub message: String,
}

impl From<AccountError> for ErrorResponse {
    fn from(err: AccountError) -> Self {
        Self {
            error: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

impl From<super::DomainError> for ErrorResponse {
    fn from(err: super::DomainError) -> Self {
        use super::DomainError;
        match err {
            DomainError::Account(e) => e.into(),
            // Storage and delivery faults surface one generic message;
            // the detail is logged, never exposed.
            DomainError::Validation { .. }
            | DomainError::Database { .. }
            | DomainError::Notification { .. }
            | DomainError::Internal { .. } => Self {
                error: "INTERNAL_ERROR".to_string(),
                message: "Something went wrong.".to_string(),
            },
        }
    }
}
