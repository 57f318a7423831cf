//! Beacon Domain - Core test harness types
//!
//! This crate defines the domain model for the Beacon API test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod case;
pub mod environment;
pub mod error;
pub mod registry;
pub mod result;

pub use case::{TestCase, TestFailure, TestFn, TestFuture, TestOutcome, UNGROUPED, ensure};
pub use environment::Environment;
pub use error::{DomainError, DomainResult};
pub use registry::{Registry, RegistryBuilder};
pub use result::{RunSummary, TestResult, TestStatus};
