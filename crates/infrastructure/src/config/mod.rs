//! Environment configuration adapters.

mod file_source;

pub use file_source::FileEnvironmentSource;
