//! Password service module
//!
//! Validates a presented password against the stored bcrypt hash and, on
//! success, persists a fresh hash of the replacement password. Stateless;
//! one repository round-trip plus one update.

mod config;
mod service;

pub use config::PasswordServiceConfig;
pub use service::PasswordService;
