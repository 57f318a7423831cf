//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod environment_source;

pub use environment_source::{EnvironmentSource, EnvironmentSourceError};
