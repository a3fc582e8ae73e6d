//! Shared test utilities used across the cfpq-data crates.

pub mod env;
pub mod proptest_profile;
pub mod tracing;
