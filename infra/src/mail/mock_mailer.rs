//! Mock mail service implementation
//!
//! Logs messages instead of sending them. Used in development and in tests
//! that exercise the full service wiring without a mail provider.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use credence_core::services::email_change::Mailer;
use credence_shared::utils::validation::{is_valid_email, mask_email};

/// Mock mail service for development and testing
///
/// This implementation:
/// - Logs messages instead of delivering them
/// - Validates recipient addresses
/// - Generates mock message ids
/// - Tracks message count for assertions
#[derive(Clone)]
pub struct MockMailService {
    /// Counter for messages handed to the service
    message_count: Arc<AtomicU64>,
    /// Whether to simulate delivery failures
    simulate_failure: bool,
}

impl MockMailService {
    /// Create a new mock mail service
    pub fn new() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Create a mock that fails every send
    pub fn failing() -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: true,
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for MockMailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailService {
    async fn send_message(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        if !is_valid_email(to) {
            return Err(format!("Invalid recipient address: {}", mask_email(to)));
        }

        if self.simulate_failure {
            warn!(
                target: "mail_service",
                provider = "mock",
                to = %mask_email(to),
                "Mock mail service simulating delivery failure"
            );
            return Err("Simulated mail delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            target: "mail_service",
            provider = "mock",
            to = %mask_email(to),
            message_id = %message_id,
            subject = %subject,
            body_len = body.len(),
            "Mock mail delivered"
        );

        Ok(message_id)
    }
}
