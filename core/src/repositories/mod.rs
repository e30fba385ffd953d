//! Repository interfaces for persistence, plus an in-memory mock for tests.

pub mod account;

pub use account::{AccountRepository, MockAccountRepository, TokenIssue};
