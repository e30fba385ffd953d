//! In-memory implementation of AccountRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{AccountError, DomainError};

use super::trait_::{AccountRepository, TokenIssue};

/// In-memory account repository for tests and development
///
/// The single write lock stands in for the database transaction: the
/// rate-limit check and the token write in `issue_confirmation_token`
/// happen under one guard.
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a mock repository seeded with one account
    pub async fn with_account(account: Account) -> Self {
        let repo = Self::new();
        repo.accounts.write().await.insert(account.id, account);
        repo
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_confirmation_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.confirmation_token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(AccountError::EmailAlreadyInUse.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn issue_confirmation_token(
        &self,
        id: Uuid,
        token: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<TokenIssue, DomainError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound)?;

        if let Some(sent_at) = account.token_sent_at {
            let reopens_at = sent_at + window;
            if reopens_at > now {
                return Ok(TokenIssue::RateLimited {
                    retry_after: reopens_at - now,
                });
            }
        }

        account.confirmation_token = Some(token.to_string());
        account.updated_at = now;
        Ok(TokenIssue::Issued)
    }

    async fn mark_token_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound)?;
        account.token_sent_at = Some(at);
        account.updated_at = at;
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound)?;
        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        // Uniqueness backstop, mirroring the database constraint
        if accounts.values().any(|a| a.id != id && a.email == email) {
            return Err(AccountError::EmailAlreadyInUse.into());
        }

        let account = accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound)?;
        account.email = email.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }
}
