//! Execution sessions: streamed, cancellable runs of a test selection.
//!
//! A session is one user-initiated run of a chosen subset against a
//! chosen environment. Each session owns a private executor (and so a
//! private results log), an event channel and a cancellation token;
//! sessions share nothing mutable besides the cumulative history log.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use beacon_domain::{Environment, Registry, RunSummary, TestCase, TestResult};

use crate::error::{ApplicationError, ApplicationResult};
use crate::executor::Executor;

/// Buffered events per session before the producer waits on the consumer.
const EVENT_BUFFER: usize = 64;

/// Tuning knobs for session runs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Pause between consecutive tests so streamed output stays
    /// readable. Zero removes the pause.
    pub inter_test_delay: Duration,
    /// Age after which a session that was never streamed to completion
    /// is purged.
    pub session_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inter_test_delay: Duration::from_millis(500),
            session_ttl: Duration::from_secs(3600),
        }
    }
}

/// Events streamed to a session's consumer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// One test finished.
    Result {
        /// Position within the session's selection, starting at zero.
        index: usize,
        /// The completed result record.
        #[serde(flatten)]
        result: TestResult,
    },
    /// The session's tests are exhausted.
    Completed {
        /// Aggregate over the session's private log.
        summary: RunSummary,
    },
}

/// Identity returned when a session is started.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Unguessable session token.
    pub session_id: String,
    /// Number of tests the session will run.
    pub total: usize,
}

struct SessionHandle {
    executor: Arc<Executor>,
    events: Option<mpsc::Receiver<SessionEvent>>,
    cancel: CancellationToken,
    created_at: DateTime<Utc>,
}

impl SessionHandle {
    fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now()
            .signed_duration_since(self.created_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

/// Creates, tracks and tears down execution sessions.
///
/// The registry is shared read-only across sessions; everything else a
/// session touches is its own.
pub struct SessionManager {
    registry: Arc<Registry>,
    config: SessionConfig,
    sessions: Mutex<HashMap<String, SessionHandle>>,
    history: Arc<Mutex<Vec<TestResult>>>,
}

impl SessionManager {
    /// Creates a manager over the shared registry.
    #[must_use]
    pub fn new(registry: Arc<Registry>, config: SessionConfig) -> Self {
        Self {
            registry,
            config,
            sessions: Mutex::new(HashMap::new()),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Starts a session running `names` (empty = every registered test)
    /// against `environment`, spawning its sequential run loop.
    ///
    /// Results stream over the session's event channel and are also
    /// appended to the cumulative history log as they complete.
    pub fn start(&self, names: &[String], environment: Environment) -> SessionInfo {
        self.purge_expired();

        let cases = if names.is_empty() {
            self.registry.tests().to_vec()
        } else {
            self.registry.find_by_names(names)
        };

        let executor = Arc::new(Executor::new(Arc::clone(&self.registry)));
        executor.set_environment(environment);

        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let session_id = Uuid::new_v4().to_string();
        let total = cases.len();

        tracing::info!(session = %session_id, total, "session started");
        tokio::spawn(run_loop(
            Arc::clone(&executor),
            cases,
            sender,
            cancel.clone(),
            Arc::clone(&self.history),
            self.config.inter_test_delay,
        ));

        self.sessions.lock().insert(
            session_id.clone(),
            SessionHandle {
                executor,
                events: Some(receiver),
                cancel,
                created_at: Utc::now(),
            },
        );

        SessionInfo { session_id, total }
    }

    /// Hands out the session's event stream, exactly once.
    ///
    /// # Errors
    ///
    /// Unknown, expired or already-streamed ids are invalid sessions.
    pub fn take_stream(&self, id: &str) -> ApplicationResult<mpsc::Receiver<SessionEvent>> {
        let mut sessions = self.sessions.lock();
        let handle = sessions.get_mut(id).ok_or_else(|| invalid_session(id))?;
        handle.events.take().ok_or_else(|| invalid_session(id))
    }

    /// Aggregate over one live session's private log.
    ///
    /// # Errors
    ///
    /// Unknown or already-finished ids are invalid sessions.
    pub fn summary(&self, id: &str) -> ApplicationResult<RunSummary> {
        self.sessions
            .lock()
            .get(id)
            .map(|handle| handle.executor.summary())
            .ok_or_else(|| invalid_session(id))
    }

    /// Requests cooperative cancellation (between tests, never mid-test)
    /// and deletes the session.
    ///
    /// # Errors
    ///
    /// Unknown ids are invalid sessions.
    pub fn cancel(&self, id: &str) -> ApplicationResult<()> {
        let handle = self
            .sessions
            .lock()
            .remove(id)
            .ok_or_else(|| invalid_session(id))?;
        handle.cancel.cancel();
        tracing::info!(session = %id, "session cancelled");
        Ok(())
    }

    /// Deletes a session whose stream has been fully consumed. Unknown
    /// ids are ignored; the stream may already have expired it.
    pub fn finish(&self, id: &str) {
        if self.sessions.lock().remove(id).is_some() {
            tracing::debug!(session = %id, "session finished and removed");
        }
    }

    /// Aggregate over every result any session has produced.
    #[must_use]
    pub fn cumulative_summary(&self) -> RunSummary {
        RunSummary::from_results(&self.history.lock())
    }

    /// Every result any session has produced, in completion order.
    #[must_use]
    pub fn history(&self) -> Vec<TestResult> {
        self.history.lock().clone()
    }

    /// Empties the cumulative history log.
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Number of live sessions.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    fn purge_expired(&self) {
        let ttl = self.config.session_ttl;
        self.sessions.lock().retain(|id, handle| {
            let expired = handle.is_expired(ttl);
            if expired {
                // Dropping the handle drops the receiver, which ends a
                // backed-up run loop on its next send.
                handle.cancel.cancel();
                tracing::debug!(session = %id, "expired session purged");
            }
            !expired
        });
    }
}

fn invalid_session(id: &str) -> ApplicationError {
    ApplicationError::NotFound(format!("session '{id}'"))
}

/// Sequential run loop of one session.
async fn run_loop(
    executor: Arc<Executor>,
    cases: Vec<Arc<TestCase>>,
    events: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
    history: Arc<Mutex<Vec<TestResult>>>,
    delay: Duration,
) {
    let total = cases.len();
    for (index, case) in cases.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::debug!(test = case.name(), "cancelled before test, stopping");
            return;
        }

        let result = executor.run_one(case).await;
        executor.record(result.clone());
        history.lock().push(result.clone());

        if events.send(SessionEvent::Result { index, result }).await.is_err() {
            // Consumer went away; running the rest would be unobserved.
            return;
        }

        if !delay.is_zero() && index + 1 < total {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    let summary = executor.summary();
    let _ = events.send(SessionEvent::Completed { summary }).await;
}
