//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts are stored in the `accounts` table with a unique index on
//! `email`. The rate-limit gate in `issue_confirmation_token` runs as a
//! `SELECT ... FOR UPDATE` followed by the token write inside one
//! transaction, so concurrent issuance attempts for the same account
//! serialize on the row lock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use credence_core::domain::entities::account::Account;
use credence_core::errors::{AccountError, DomainError};
use credence_core::repositories::{AccountRepository, TokenIssue};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, email_confirmed, \
     confirmation_token, token_sent_at, created_at, updated_at";

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an Account entity
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| storage_error("id", e))?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid account UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| storage_error("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| storage_error("password_hash", e))?,
            email_confirmed: row
                .try_get("email_confirmed")
                .map_err(|e| storage_error("email_confirmed", e))?,
            confirmation_token: row
                .try_get("confirmation_token")
                .map_err(|e| storage_error("confirmation_token", e))?,
            token_sent_at: row
                .try_get::<Option<DateTime<Utc>>, _>("token_sent_at")
                .map_err(|e| storage_error("token_sent_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| storage_error("updated_at", e))?,
        })
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE {} = ? LIMIT 1",
            ACCOUNT_COLUMNS, column
        );

        let result = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to query account by {}: {}", column, e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }
}

fn storage_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Database {
        message: format!("Failed to read column {}: {}", column, e),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        self.fetch_one_by("id", &id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn find_by_confirmation_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, DomainError> {
        self.fetch_one_by("confirmation_token", token).await
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, email, password_hash, email_confirmed,
                confirmation_token, token_sent_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.email_confirmed)
            .bind(&account.confirmation_token)
            .bind(account.token_sent_at)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Account(AccountError::EmailAlreadyInUse)
                } else {
                    DomainError::Database {
                        message: format!("Failed to create account: {}", e),
                    }
                }
            })?;

        Ok(account)
    }

    async fn issue_confirmation_token(
        &self,
        id: Uuid,
        token: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<TokenIssue, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Database {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Row lock serializes concurrent issuance attempts for this account
        let row = sqlx::query("SELECT token_sent_at FROM accounts WHERE id = ? FOR UPDATE")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to lock account row: {}", e),
            })?
            .ok_or(AccountError::AccountNotFound)?;

        let token_sent_at: Option<DateTime<Utc>> = row
            .try_get("token_sent_at")
            .map_err(|e| storage_error("token_sent_at", e))?;

        if let Some(sent_at) = token_sent_at {
            let reopens_at = sent_at + window;
            if reopens_at > now {
                tx.rollback().await.map_err(|e| DomainError::Database {
                    message: format!("Failed to roll back transaction: {}", e),
                })?;
                return Ok(TokenIssue::RateLimited {
                    retry_after: reopens_at - now,
                });
            }
        }

        sqlx::query("UPDATE accounts SET confirmation_token = ?, updated_at = ? WHERE id = ?")
            .bind(token)
            .bind(now)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to write confirmation token: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Database {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(TokenIssue::Issued)
    }

    async fn mark_token_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE accounts SET token_sent_at = ?, updated_at = ? WHERE id = ?")
                .bind(at)
                .bind(at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to record send time: {}", e),
                })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound.into());
        }
        Ok(())
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE accounts SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to update password hash: {}", e),
                })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound.into());
        }
        Ok(())
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET email = ?, updated_at = ? WHERE id = ?")
            .bind(email)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // Unique index on email is the backstop for pre-check races
                if is_unique_violation(&e) {
                    DomainError::Account(AccountError::EmailAlreadyInUse)
                } else {
                    DomainError::Database {
                        message: format!("Failed to update email: {}", e),
                    }
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AccountError::AccountNotFound.into());
        }
        Ok(())
    }
}
