//! Execution results and aggregate summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::case::TestCase;

/// State of one execution attempt.
///
/// `Pending` is the initial value baked into a fresh result; completed
/// attempts always carry one of the three terminal states. A `Pending`
/// result in a log means an execution started but never finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Execution has started but not completed.
    Pending,
    /// The test body completed without failure.
    Passed,
    /// The test body returned or raised a failure.
    Failed,
    /// The test was marked skipped and never invoked.
    Skipped,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// Outcome record of executing one test case.
///
/// Created fresh per execution and never mutated once appended to a
/// results log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name, copied from the case at execution time.
    pub name: String,
    /// Group label, copied from the case at execution time.
    pub group: String,
    /// Execution state.
    pub status: TestStatus,
    /// Wall-clock duration of the attempt in milliseconds, rounded to
    /// two decimals. Measured on every path, including skips.
    pub execution_time_ms: f64,
    /// Failure description; present iff `status` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Auxiliary payload from the test body; reserved, unused today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl TestResult {
    /// Creates the initial `pending` record for a case.
    #[must_use]
    pub fn pending(case: &TestCase) -> Self {
        Self {
            name: case.name().to_string(),
            group: case.group().to_string(),
            status: TestStatus::Pending,
            execution_time_ms: 0.0,
            error: None,
            response: None,
        }
    }
}

/// Aggregate counts over a results log.
///
/// The four status counts always sum to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of results counted.
    pub total: usize,
    /// Results with status `passed`.
    pub passed: usize,
    /// Results with status `failed`.
    pub failed: usize,
    /// Results with status `skipped`.
    pub skipped: usize,
    /// Results stuck at `pending`; normally zero.
    pub pending: usize,
}

impl RunSummary {
    /// Counts the statuses in a results log.
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                TestStatus::Pending => summary.pending += 1,
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// True when nothing failed and nothing is stuck pending.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.pending == 0
    }
}
