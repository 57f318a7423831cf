//! Test execution engine.
//!
//! Runs registered test cases one at a time against the active
//! environment, capturing timing, status and failure messages, and owns
//! the ordered results log.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use parking_lot::{Mutex, RwLock};

use beacon_domain::{Environment, Registry, RunSummary, TestCase, TestResult, TestStatus};

use crate::error::ApplicationResult;

/// Runs test cases and records their results.
///
/// One executor is one execution context: a single active environment, a
/// single chronological results log, strictly sequential runs. Sessions
/// each construct their own executor over the shared registry; the
/// registry itself is immutable and needs no locking.
pub struct Executor {
    registry: Arc<Registry>,
    environment: RwLock<Environment>,
    results: Mutex<Vec<TestResult>>,
}

impl Executor {
    /// Creates an executor over a registry, with an empty environment
    /// and an empty results log.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            environment: RwLock::new(Environment::new()),
            results: Mutex::new(Vec::new()),
        }
    }

    /// The registry this executor selects tests from.
    #[must_use]
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Replaces the active environment. Last write wins; executions
    /// already holding the previous value are unaffected.
    pub fn set_environment(&self, environment: Environment) {
        *self.environment.write() = environment;
    }

    /// A snapshot of the active environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.read().clone()
    }

    /// Runs a single case and returns its result without logging it.
    ///
    /// Skipped cases are never invoked. A failure returned by the body,
    /// or a panic escaping it, becomes a `failed` result with a message;
    /// nothing unwinds past this method. Elapsed time is recorded on
    /// every path, including skips.
    pub async fn run_one(&self, case: &TestCase) -> TestResult {
        let started = Instant::now();
        let mut result = TestResult::pending(case);

        if case.is_skipped() {
            result.status = TestStatus::Skipped;
        } else {
            let environment = self.environment();
            match AssertUnwindSafe(case.invoke(environment)).catch_unwind().await {
                Ok(Ok(())) => result.status = TestStatus::Passed,
                Ok(Err(failure)) => {
                    result.status = TestStatus::Failed;
                    result.error = Some(failure.message().to_string());
                }
                Err(panic) => {
                    result.status = TestStatus::Failed;
                    result.error = Some(panic_message(panic.as_ref()));
                }
            }
        }

        result.execution_time_ms = elapsed_ms(started);
        tracing::debug!(
            test = case.name(),
            group = case.group(),
            status = %result.status,
            elapsed_ms = result.execution_time_ms,
            "test finished"
        );
        result
    }

    /// Runs the named tests, or every registered test when `names` is
    /// empty, in registry order. Each result is appended to the log and
    /// returned in execution order.
    pub async fn run_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<TestResult> {
        let selected = if names.is_empty() {
            self.registry.tests().to_vec()
        } else {
            self.registry.find_by_names(names)
        };
        self.run_selected(&selected).await
    }

    /// Runs all tests of a group in the group's stored order.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the group was never registered.
    pub async fn run_group(&self, name: &str) -> ApplicationResult<Vec<TestResult>> {
        let cases = self.registry.group(name)?.to_vec();
        Ok(self.run_selected(&cases).await)
    }

    async fn run_selected(&self, cases: &[Arc<TestCase>]) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            let result = self.run_one(case).await;
            self.record(result.clone());
            results.push(result);
        }
        results
    }

    /// Appends one result to the log.
    pub fn record(&self, result: TestResult) {
        self.results.lock().push(result);
    }

    /// The accumulated log in chronological order.
    #[must_use]
    pub fn results(&self) -> Vec<TestResult> {
        self.results.lock().clone()
    }

    /// Empties the log. Registered tests and the environment selection
    /// are unaffected.
    pub fn clear_results(&self) {
        self.results.lock().clear();
    }

    /// Aggregate counts over the current log.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(&self.results.lock())
    }
}

/// Milliseconds since `started`, rounded to two decimals.
fn elapsed_ms(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

/// Extracts a readable message from a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked".to_string()
    }
}
