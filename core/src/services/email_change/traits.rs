//! Trait for outbound mail integration

use async_trait::async_trait;

/// Trait for mail delivery integration
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text message
    ///
    /// Returns a provider message id on success.
    async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<String, String>;
}
