//! Business services containing domain logic and use cases.

pub mod email_change;
pub mod password;

// Re-export commonly used types
pub use email_change::{
    EmailChangeConfirmed, EmailChangeService, EmailChangeServiceConfig, Mailer, RequestOutcome,
};
pub use password::{PasswordService, PasswordServiceConfig};
