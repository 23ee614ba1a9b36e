//! Unit tests for n8n-provision
//!
//! These tests use mocked dependencies and run fast without touching the host.

mod architecture;
mod backup_routine;
mod helpers;
mod property_tests;
mod templates;
