//! Account repository trait defining the interface for account persistence.
//!
//! The trait is deliberately narrow: every mutation the credential services
//! need is a named, parameterized operation rather than a generic query
//! surface. Implementations own the transactional guarantees; the services
//! never take in-process locks.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Outcome of an atomic confirmation-token issuance attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenIssue {
    /// The token was written; a confirmation message may now be sent
    Issued,
    /// A token was already issued within the rate-limit window
    RateLimited {
        /// Time left until issuance is allowed again
        retry_after: Duration,
    },
}

/// Repository trait for account persistence operations
///
/// # Concurrency contract
///
/// `issue_confirmation_token` must execute its read-check-write as one
/// isolated unit against the account row, so that two concurrent calls for
/// the same account cannot both pass the rate-limit gate. `update_email`
/// relies on the store's uniqueness constraint on `email` as the final
/// backstop when the caller's pre-check races with another writer.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with the given id
    /// * `Err(DomainError)` - Storage fault
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find the account currently holding an email address
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find the account holding an outstanding confirmation token
    ///
    /// Expiry is not checked here; the caller owns the time-box decision.
    async fn find_by_confirmation_token(&self, token: &str)
        -> Result<Option<Account>, DomainError>;

    /// Create a new account
    ///
    /// Fails with `EmailAlreadyInUse` if the address is taken.
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Atomically issue a confirmation token, enforcing the rate limit
    ///
    /// Reads `token_sent_at`, and only when no message was sent within
    /// `window` writes `token` as the pending confirmation token. The check
    /// and the write happen under one transaction.
    ///
    /// # Returns
    /// * `Ok(TokenIssue::Issued)` - Token written
    /// * `Ok(TokenIssue::RateLimited { retry_after })` - Window still open
    /// * `Err(DomainError)` - Unknown account or storage fault
    async fn issue_confirmation_token(
        &self,
        id: Uuid,
        token: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<TokenIssue, DomainError>;

    /// Record that the confirmation message was handed to the mailer
    ///
    /// This is the write that starts the rate-limit clock and the token
    /// lifetime; it happens after the send, not at token creation.
    async fn mark_token_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Replace the stored password hash in a single atomic update
    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), DomainError>;

    /// Replace the account's email address in a single atomic update
    ///
    /// Fails with `EmailAlreadyInUse` when the address was claimed by
    /// another account since the caller's pre-check.
    async fn update_email(&self, id: Uuid, email: &str) -> Result<(), DomainError>;
}
