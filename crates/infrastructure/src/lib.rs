//! Beacon Infrastructure - Adapters and sample payloads
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer, plus the sample HTTP suite the default binary
//! registers.

pub mod config;
pub mod suites;

pub use config::FileEnvironmentSource;
