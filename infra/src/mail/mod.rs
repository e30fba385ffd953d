//! Mail delivery module
//!
//! Implementations of the core `Mailer` seam: the Postmark HTTP client for
//! production and a logging mock for development and tests.

pub mod mock_mailer;
pub mod postmark;

pub use mock_mailer::MockMailService;
pub use postmark::PostmarkMailClient;
