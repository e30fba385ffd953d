//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management and the MySQL account repository.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlAccountRepository;
