//! Email-change service implementation

use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use credence_shared::utils::validation::{is_valid_email, mask_email};

use crate::domain::entities::account::{Account, TOKEN_LENGTH};
use crate::errors::{AccountError, DomainError, DomainResult};
use crate::repositories::{AccountRepository, TokenIssue};

use super::config::EmailChangeServiceConfig;
use super::traits::Mailer;
use super::types::{EmailChangeConfirmed, RequestOutcome};

/// Service coordinating the email-change protocol
pub struct EmailChangeService<R: AccountRepository, M: Mailer> {
    /// Account repository for persistence
    repository: Arc<R>,
    /// Mailer for confirmation messages
    mailer: Arc<M>,
    /// Service configuration
    config: EmailChangeServiceConfig,
}

impl<R: AccountRepository, M: Mailer> EmailChangeService<R, M> {
    /// Create a new email-change service
    pub fn new(repository: Arc<R>, mailer: Arc<M>, config: EmailChangeServiceConfig) -> Self {
        Self {
            repository,
            mailer,
            config,
        }
    }

    /// Request a change of the account's email address
    ///
    /// This method:
    /// 1. Validates the new address syntactically
    /// 2. Rejects addresses held by other accounts; treats the account's
    ///    own current address as a silent success
    /// 3. Atomically issues a confirmation token, enforcing the per-account
    ///    rate limit inside one storage transaction
    /// 4. Sends the confirmation link to the new address
    /// 5. Only after the send succeeds, records the send time - the write
    ///    that starts the rate-limit clock and the token lifetime
    ///
    /// # Arguments
    ///
    /// * `account_id` - The account requesting the change
    /// * `new_email` - The address to change to
    pub async fn request_email_change(
        &self,
        account_id: Uuid,
        new_email: &str,
    ) -> DomainResult<RequestOutcome> {
        if !is_valid_email(new_email) {
            return Err(AccountError::InvalidEmailFormat.into());
        }

        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        if let Some(holder) = self.repository.find_by_email(new_email).await? {
            if holder.id == account.id {
                // Changing to the current address: nothing to do, and no
                // point burning a rate-limit slot on it.
                tracing::debug!(
                    account_id = %account.id,
                    event = "email_change_noop",
                    "Requested address is already current"
                );
                return Ok(RequestOutcome::AlreadyCurrent);
            }
            return Err(AccountError::EmailAlreadyInUse.into());
        }

        let token = generate_token();
        let now = Utc::now();
        let window = Duration::seconds(self.config.rate_limit_window_seconds);

        match self
            .repository
            .issue_confirmation_token(account.id, &token, now, window)
            .await?
        {
            TokenIssue::Issued => {}
            TokenIssue::RateLimited { retry_after } => {
                let retry_after_secs = round_to_whole_seconds(retry_after);
                tracing::warn!(
                    account_id = %account.id,
                    retry_after_secs,
                    event = "email_change_rate_limited",
                    "Confirmation token issuance rejected by rate limit"
                );
                return Err(AccountError::RateLimited { retry_after_secs }.into());
            }
        }

        let link = self.confirmation_link(&token, new_email)?;
        let subject = format!("{}: Verify your email-address", self.config.site_domain);
        let body = format!(
            "To update your email on {domain} please verify it by clicking this link:\n\n\
             {link}\n\n\
             Best regards,\n\n\
             {domain}\n",
            domain = self.config.site_domain,
            link = link,
        );

        let message_id = self
            .mailer
            .send_message(new_email, &subject, &body)
            .await
            .map_err(|e| {
                tracing::error!(
                    account_id = %account.id,
                    new_email = %mask_email(new_email),
                    error = %e,
                    event = "confirmation_send_failed",
                    "Failed to send confirmation message"
                );
                // The token stays in place but the send time is never
                // recorded, so the rate-limit clock has not started and a
                // retry can issue a fresh token.
                DomainError::Notification {
                    message: format!("Failed to send confirmation message: {}", e),
                }
            })?;

        self.repository.mark_token_sent(account.id, Utc::now()).await?;

        tracing::info!(
            account_id = %account.id,
            new_email = %mask_email(new_email),
            message_id = %message_id,
            event = "email_change_requested",
            "Confirmation message sent"
        );

        Ok(RequestOutcome::ConfirmationSent { message_id })
    }

    /// Confirm a pending email change from a delivered link
    ///
    /// This method:
    /// 1. Looks the account up by the presented token
    /// 2. Requires the account to have completed signup verification
    /// 3. Enforces the token time-box against the recorded send time
    /// 4. Re-checks address uniqueness - the world may have moved since
    ///    the request was issued
    /// 5. Swaps the email in a single atomic update
    ///
    /// A replay with the same token after the swap is benign: the address
    /// already belongs to the account and the call succeeds without
    /// writing, unless the address was reassigned elsewhere in the
    /// meantime, in which case the uniqueness re-check rejects it.
    ///
    /// On success the caller must invalidate the account's current
    /// authentication session, as instructed by the returned value.
    pub async fn confirm_email_change(
        &self,
        token: &str,
        new_email: &str,
    ) -> DomainResult<EmailChangeConfirmed> {
        let account = self
            .repository
            .find_by_confirmation_token(token)
            .await?
            .ok_or(AccountError::InvalidToken)?;

        if !account.email_confirmed {
            return Err(AccountError::AccountNotEligible.into());
        }

        let ttl = Duration::minutes(self.config.confirmation_ttl_minutes);
        if account.is_token_expired(Utc::now(), ttl) {
            tracing::info!(
                account_id = %account.id,
                event = "confirmation_token_expired",
                "Confirmation link presented after expiry"
            );
            return Err(AccountError::TokenExpired.into());
        }

        if let Some(holder) = self.repository.find_by_email(new_email).await? {
            if holder.id != account.id {
                return Err(AccountError::EmailAlreadyInUse.into());
            }
            // Replayed confirmation: the swap already happened.
            return Ok(self.confirmed(&account, new_email));
        }

        self.repository.update_email(account.id, new_email).await?;

        tracing::info!(
            account_id = %account.id,
            new_email = %mask_email(new_email),
            event = "email_changed",
            "Email address updated"
        );

        Ok(self.confirmed(&account, new_email))
    }

    fn confirmed(&self, account: &Account, new_email: &str) -> EmailChangeConfirmed {
        EmailChangeConfirmed {
            account_id: account.id,
            email: new_email.to_string(),
            invalidate_session: true,
        }
    }

    /// Build the confirmation link delivered to the new address
    ///
    /// Shape: `https://{site_domain}/user/settings/email/{token}?email={addr}`
    /// with the address URL-encoded in the query.
    fn confirmation_link(&self, token: &str, new_email: &str) -> DomainResult<String> {
        let mut url = Url::parse(&format!("https://{}", self.config.site_domain)).map_err(
            |e| DomainError::Internal {
                message: format!("Invalid site domain in configuration: {}", e),
            },
        )?;
        url.set_path(&format!("user/settings/email/{}", token));
        url.query_pairs_mut().append_pair("email", new_email);
        Ok(url.into())
    }
}

/// Generate an unguessable confirmation token
///
/// 40 alphanumeric characters drawn from the OS CSPRNG.
fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Round a remaining wait to whole seconds, half up, never below one.
///
/// The user-facing message promises whole seconds; 289.7s reads as 290,
/// not 289.
fn round_to_whole_seconds(retry_after: Duration) -> i64 {
    ((retry_after.num_milliseconds() + 500) / 1000).max(1)
}
