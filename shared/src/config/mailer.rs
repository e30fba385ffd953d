//! Outbound mail delivery configuration

use serde::{Deserialize, Serialize};

/// Configuration for the outbound mail client and confirmation links
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailerConfig {
    /// Public site domain embedded in confirmation links
    #[serde(default = "default_site_domain")]
    pub site_domain: String,

    /// Base URL of the mail delivery API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Sender address for outbound messages
    #[serde(default = "default_sender")]
    pub sender: String,

    /// API token for the mail provider
    #[serde(default)]
    pub server_token: String,

    /// Use the console-logging mock instead of the HTTP client
    #[serde(default)]
    pub use_mock: bool,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            site_domain: default_site_domain(),
            api_base_url: default_api_base_url(),
            sender: default_sender(),
            server_token: String::new(),
            use_mock: false,
        }
    }
}

fn default_site_domain() -> String {
    String::from("localhost:8080")
}

fn default_api_base_url() -> String {
    String::from("https://api.postmarkapp.com")
}

fn default_sender() -> String {
    String::from("no-reply@localhost")
}
