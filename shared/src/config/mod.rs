//! Configuration module with business-specific sub-modules
//!
//! Configuration is organized into logical areas:
//! - `credentials` - Password hashing and email-change policy
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging setup
//! - `mailer` - Outbound mail delivery configuration

pub mod credentials;
pub mod database;
pub mod environment;
pub mod mailer;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use credentials::CredentialPolicyConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use mailer::MailerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Credential lifecycle policy
    #[serde(default)]
    pub credentials: CredentialPolicyConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub mailer: MailerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            database: DatabaseConfig::default(),
            credentials: CredentialPolicyConfig::default(),
            mailer: MailerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment-specific file and
    /// `CREDENCE_`-prefixed environment variables.
    ///
    /// Environment variables win over file values, so deployments can
    /// override single settings without shipping a new config file.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();

        config::Config::builder()
            .add_source(config::File::with_name(environment.config_file()).required(false))
            .add_source(config::Environment::with_prefix("CREDENCE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.credentials.confirmation_ttl_minutes, 30);
    }

    #[test]
    fn test_config_deserializes_from_partial_input() {
        let config: AppConfig =
            serde_json::from_str(r#"{"credentials": {"rate_limit_window_seconds": 120}}"#)
                .unwrap();
        assert_eq!(config.credentials.rate_limit_window_seconds, 120);
        // Untouched sections fall back to defaults
        assert_eq!(config.credentials.confirmation_ttl_minutes, 30);
        assert_eq!(config.database.max_connections, 10);
    }
}
