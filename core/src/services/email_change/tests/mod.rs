//! Tests for the email-change service

mod service_tests;
