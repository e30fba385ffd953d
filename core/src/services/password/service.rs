//! Password change service implementation

use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AccountError, DomainError, DomainResult};
use crate::repositories::AccountRepository;

use super::config::PasswordServiceConfig;

/// Service for verifying and replacing account passwords
pub struct PasswordService<R: AccountRepository> {
    /// Account repository for persistence
    repository: Arc<R>,
    /// Service configuration
    config: PasswordServiceConfig,
}

impl<R: AccountRepository> PasswordService<R> {
    /// Create a new password service
    pub fn new(repository: Arc<R>, config: PasswordServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Change an account's password
    ///
    /// The current password must verify against the stored hash before the
    /// replacement is hashed and persisted. Verification failures and an
    /// unparseable stored hash both surface as `InvalidCredential`; callers
    /// must not be able to tell them apart.
    ///
    /// Existing sessions stay alive after a password change.
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account whose password is changing
    /// * `current_password` - The password to verify
    /// * `new_password` - The replacement password
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if !account.email_confirmed {
            return Err(AccountError::EmailNotConfirmed.into());
        }

        let verified = bcrypt::verify(current_password, &account.password_hash)
            .map_err(|e| {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    event = "password_hash_unreadable",
                    "Stored password hash could not be verified"
                );
                AccountError::InvalidCredential
            })?;

        if !verified {
            tracing::warn!(
                account_id = %account.id,
                event = "password_verification_failed",
                "Presented password did not match stored hash"
            );
            return Err(AccountError::InvalidCredential.into());
        }

        let new_hash = bcrypt::hash(new_password, self.config.hash_cost).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            }
        })?;

        self.repository
            .update_password_hash(account.id, &new_hash)
            .await?;

        tracing::info!(
            account_id = %account.id,
            event = "password_changed",
            "Password updated"
        );

        Ok(())
    }
}
