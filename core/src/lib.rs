//! # Credence Core
//!
//! Core business logic and domain layer for the Credence account services.
//! This crate contains the account entity, the repository interface, the two
//! credential services (password changes and the email-change protocol), and
//! the domain error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
