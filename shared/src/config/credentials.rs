//! Credential lifecycle policy configuration

use serde::{Deserialize, Serialize};

/// Policy knobs for password changes and the email-change protocol
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialPolicyConfig {
    /// Minimum interval between confirmation-token issuances per account,
    /// in seconds
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_seconds: i64,

    /// Lifetime of an issued confirmation token, in minutes
    #[serde(default = "default_confirmation_ttl")]
    pub confirmation_ttl_minutes: i64,

    /// bcrypt work factor for newly hashed passwords
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

impl Default for CredentialPolicyConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_seconds: default_rate_limit_window(),
            confirmation_ttl_minutes: default_confirmation_ttl(),
            hash_cost: default_hash_cost(),
        }
    }
}

fn default_rate_limit_window() -> i64 {
    300 // 5 minutes
}

fn default_confirmation_ttl() -> i64 {
    30
}

fn default_hash_cost() -> u32 {
    10
}
