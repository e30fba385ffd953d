//! Email-change service module
//!
//! Orchestrates the multi-step, rate-limited, token-based email-change
//! protocol:
//! - request issuance with an atomic rate-limit gate
//! - confirmation-link delivery through a mailer collaborator
//! - time-boxed token validation and the atomic email swap
//!
//! All protocol state lives in the account record; the service itself is
//! stateless and may be invoked concurrently for the same account.

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::EmailChangeServiceConfig;
pub use service::EmailChangeService;
pub use traits::Mailer;
pub use types::{EmailChangeConfirmed, RequestOutcome};
