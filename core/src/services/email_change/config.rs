//! Configuration for the email-change service

use credence_shared::config::{CredentialPolicyConfig, MailerConfig};

use crate::domain::entities::account::CONFIRMATION_TTL_MINUTES;

/// Configuration for the email-change service
#[derive(Debug, Clone)]
pub struct EmailChangeServiceConfig {
    /// Minimum seconds between confirmation-token issuances per account
    pub rate_limit_window_seconds: i64,
    /// Minutes before an issued confirmation token expires
    pub confirmation_ttl_minutes: i64,
    /// Public site domain embedded in confirmation links
    pub site_domain: String,
}

impl Default for EmailChangeServiceConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_seconds: 300,
            confirmation_ttl_minutes: CONFIRMATION_TTL_MINUTES,
            site_domain: String::from("localhost:8080"),
        }
    }
}

impl EmailChangeServiceConfig {
    /// Build the service configuration from the application config sections
    pub fn from_app_config(policy: &CredentialPolicyConfig, mailer: &MailerConfig) -> Self {
        Self {
            rate_limit_window_seconds: policy.rate_limit_window_seconds,
            confirmation_ttl_minutes: policy.confirmation_ttl_minutes,
            site_domain: mailer.site_domain.clone(),
        }
    }
}
