//! Test case definition and the executable calling convention.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::environment::Environment;

/// Group label applied when a test is registered without one.
pub const UNGROUPED: &str = "Ungrouped";

/// A failed check or error raised by a test body.
///
/// Failures are values, not unwinding: a test body returns one and the
/// executor records it as a `failed` result for that test alone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TestFailure {
    message: String,
}

impl TestFailure {
    /// Creates a failure with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Wraps an underlying error (client errors, parse errors, ...).
    pub fn caused_by(source: impl fmt::Display) -> Self {
        Self {
            message: source.to_string(),
        }
    }

    /// The human-readable failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome returned by a test body.
pub type TestOutcome = Result<(), TestFailure>;

/// Boxed future produced by invoking a test executable.
pub type TestFuture = Pin<Box<dyn Future<Output = TestOutcome> + Send>>;

/// Executable body of a test case.
///
/// Fixed calling convention: every test receives the active
/// [`Environment`], which may be empty.
pub type TestFn = Arc<dyn Fn(Environment) -> TestFuture + Send + Sync>;

/// Fails the test unless the condition holds.
///
/// # Errors
///
/// Returns a [`TestFailure`] carrying `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::new(message))
    }
}

/// A named, executable unit of verification logic with an associated
/// group and skip flag.
///
/// Created once at registration time and immutable afterwards.
#[derive(Clone)]
pub struct TestCase {
    name: String,
    group: String,
    skipped: bool,
    run: TestFn,
}

impl TestCase {
    /// Creates a test case in the default group.
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(Environment) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestOutcome> + Send + 'static,
    {
        Self {
            name: name.into(),
            group: UNGROUPED.to_string(),
            skipped: false,
            run: Arc::new(move |env| -> TestFuture { Box::pin(run(env)) }),
        }
    }

    /// Assigns the test to a group. Blank labels keep the default group,
    /// so a group name is always non-empty.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        if !group.trim().is_empty() {
            self.group = group;
        }
        self
    }

    /// Marks the test as skipped; idempotent.
    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.skipped = true;
        self
    }

    /// The test's registered name. Uniqueness is a convention, not
    /// enforced.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group label.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Whether executions of this test short-circuit to `skipped`.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Invokes the executable against the given environment.
    #[must_use]
    pub fn invoke(&self, env: Environment) -> TestFuture {
        (self.run)(env)
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}
