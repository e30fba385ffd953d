//! Account entity representing a registered account and its credential state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a generated confirmation token in characters
pub const TOKEN_LENGTH: usize = 40;

/// Default lifetime of an issued confirmation token in minutes
pub const CONFIRMATION_TTL_MINUTES: i64 = 30;

/// Account entity holding the credential state governed by this service
///
/// `confirmation_token` and `token_sent_at` carry the pending email-change
/// state; staleness is checked at read time, nothing clears them in the
/// background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Current verified email address, unique across all accounts
    pub email: String,

    /// bcrypt hash of the account password
    pub password_hash: String,

    /// Whether the original signup email has been verified
    pub email_confirmed: bool,

    /// Pending single-use confirmation token, if one is outstanding
    pub confirmation_token: Option<String>,

    /// When the last confirmation message was handed to the mailer
    pub token_sent_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new unconfirmed account
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            email_confirmed: false,
            confirmation_token: None,
            token_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the signup email as verified
    pub fn confirm_email(&mut self) {
        self.email_confirmed = true;
        self.updated_at = Utc::now();
    }

    /// Stores a freshly issued confirmation token
    pub fn set_confirmation_token(&mut self, token: String) {
        self.confirmation_token = Some(token);
        self.updated_at = Utc::now();
    }

    /// Records when the confirmation message was sent
    pub fn mark_token_sent(&mut self, at: DateTime<Utc>) {
        self.token_sent_at = Some(at);
        self.updated_at = Utc::now();
    }

    /// Whether the outstanding token is past its lifetime at `now`
    ///
    /// A token with no recorded send time is treated as expired: the send
    /// either never completed or predates the timestamp column.
    pub fn is_token_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self.token_sent_at {
            Some(sent_at) => now > sent_at + ttl,
            None => true,
        }
    }
}
