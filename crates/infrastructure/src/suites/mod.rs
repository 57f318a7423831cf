//! Sample verification suites registered by the default binary.

pub mod httpbin;
