//! Tests for the database layer

mod connection_tests;
