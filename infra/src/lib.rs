//! # Credence Infrastructure
//!
//! Concrete implementations behind the core crate's seams: MySQL persistence
//! for accounts via SQLx, and mail delivery through Postmark's HTTP API with
//! a logging mock for development.

pub mod database;
pub mod mail;

pub use database::{DatabasePool, MySqlAccountRepository, PoolStatistics};
pub use mail::{MockMailService, PostmarkMailClient};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(String),
}
