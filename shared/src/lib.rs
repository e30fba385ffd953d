//! Shared configuration and utilities for the Credence account services
//!
//! This crate provides the pieces used across all server modules:
//! - Configuration types and environment detection
//! - Validation utilities (email format, log masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CredentialPolicyConfig, DatabaseConfig, Environment, MailerConfig,
};
pub use utils::validation;
