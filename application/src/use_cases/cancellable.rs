//! Cancellable execution wrapper.
//!
//! Runs a prepared [`ProcessExecutor`] on a worker task while a monitor task
//! polls a [`CancellationSignal`] at a fixed interval:
//!
//! ```text
//!            spawn()
//!               │
//!     ┌─────────┴──────────┐
//!     ▼                    ▼
//! worker task          monitor task
//! execute().await      every poll_interval:
//!     │                  signal cancelled? ──▶ kill() once, stop polling
//!     │                  worker done?      ──▶ stop polling
//!     ▼
//! Completed / Killed / Failed
//!               │
//!     wait_until_finished() joins both ──▶ Finished
//! ```
//!
//! The kill decision and the worker's final transition are taken under the
//! same lock in [`ExecutionTracker`], so a cancellation observed after the
//! child exited never turns a completed run into a killed one.

use crate::ports::cancellation::CancellationSignal;
use crate::ports::process_executor::{ExecutionError, ProcessExecutor};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use toolbridge_domain::ExecutionState;
use tracing::{debug, warn};

use crate::config::DEFAULT_POLL_INTERVAL;

/// Exit code reported when no real exit code is available.
pub const FAILED_EXIT_CODE: i32 = -1;

#[derive(Debug)]
struct TrackerState {
    state: ExecutionState,
    kill_issued: bool,
}

/// Shared state machine of one invocation.
#[derive(Debug)]
pub struct ExecutionTracker {
    inner: Mutex<TrackerState>,
}

impl Default for ExecutionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TrackerState {
                state: ExecutionState::Idle,
                kill_issued: false,
            }),
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.inner.lock().unwrap().state
    }

    pub fn kill_issued(&self) -> bool {
        self.inner.lock().unwrap().kill_issued
    }

    /// Apply a transition; invalid transitions are ignored and reported.
    pub fn transition(&self, next: ExecutionState) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.state.can_transition_to(next) {
            debug!(from = %inner.state, to = %next, "Execution state change");
            inner.state = next;
            true
        } else {
            warn!(from = %inner.state, to = %next, "Ignoring invalid execution state change");
            false
        }
    }

    /// Kill the child if the invocation is running and no kill was issued yet.
    pub fn kill_if_running(&self, executor: &dyn ProcessExecutor) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.state.accepts_cancellation() || inner.kill_issued {
            return false;
        }
        inner.kill_issued = true;
        executor.kill();
        true
    }

    /// Record the worker's result as the outcome state.
    fn finish(&self, result: &Result<i32, ExecutionError>) {
        let mut inner = self.inner.lock().unwrap();
        let next = match result {
            _ if inner.kill_issued => ExecutionState::Killed,
            Ok(_) => ExecutionState::Completed,
            Err(_) => ExecutionState::Failed,
        };
        if inner.state.can_transition_to(next) {
            inner.state = next;
        }
    }
}

/// Result of a joined invocation.
#[derive(Debug)]
pub struct ExecutionReport {
    /// Child exit code, or [`FAILED_EXIT_CODE`]
    pub exit_code: i32,
    /// Outcome state (`Completed`, `Killed` or `Failed`)
    pub state: ExecutionState,
    pub kill_issued: bool,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub error: Option<ExecutionError>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.state == ExecutionState::Completed && self.exit_code == 0
    }
}

/// Builder for a cancellable run of a prepared executor.
pub struct CancellableExecution {
    executor: Arc<dyn ProcessExecutor>,
    signal: Arc<dyn CancellationSignal>,
    poll_interval: Duration,
    tracker: Arc<ExecutionTracker>,
}

impl CancellableExecution {
    pub fn new(executor: Arc<dyn ProcessExecutor>, signal: Arc<dyn CancellationSignal>) -> Self {
        Self {
            executor,
            signal,
            poll_interval: DEFAULT_POLL_INTERVAL,
            tracker: Arc::new(ExecutionTracker::new()),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Use a tracker that already went through `Preparing`.
    pub fn with_tracker(mut self, tracker: Arc<ExecutionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Start the worker and the monitor.
    pub fn spawn(self) -> ExecutionHandle {
        let tracker = self.tracker;
        if tracker.state() == ExecutionState::Idle {
            tracker.transition(ExecutionState::Preparing);
        }
        tracker.transition(ExecutionState::Running);

        let done = CancellationToken::new();

        let worker = {
            let executor = Arc::clone(&self.executor);
            let tracker = Arc::clone(&tracker);
            // Cancels `done` even if execute() panics
            let done_guard = done.clone().drop_guard();
            tokio::spawn(async move {
                let _done_guard = done_guard;
                let result = executor.execute().await;
                tracker.finish(&result);
                result
            })
        };

        let monitor = {
            let executor = Arc::clone(&self.executor);
            let tracker = Arc::clone(&tracker);
            let signal = self.signal;
            let done = done.clone();
            let poll_interval = self.poll_interval.max(Duration::from_millis(1));
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(poll_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        _ = done.cancelled() => break false,
                        _ = interval.tick() => {
                            if signal.is_cancelled() {
                                let killed = tracker.kill_if_running(executor.as_ref());
                                debug!(killed, "Cancellation observed");
                                break killed;
                            }
                        }
                    }
                }
            })
        };

        ExecutionHandle {
            worker,
            monitor,
            done,
            tracker,
            executor: self.executor,
        }
    }
}

/// Handle to a running invocation.
pub struct ExecutionHandle {
    worker: JoinHandle<Result<i32, ExecutionError>>,
    monitor: JoinHandle<bool>,
    done: CancellationToken,
    tracker: Arc<ExecutionTracker>,
    executor: Arc<dyn ProcessExecutor>,
}

impl ExecutionHandle {
    pub fn tracker(&self) -> &Arc<ExecutionTracker> {
        &self.tracker
    }

    /// Join the worker and then the monitor, and collect the result.
    ///
    /// Output is read only after both tasks have finished, so a kill in
    /// flight cannot race with the result.
    pub async fn wait_until_finished(self) -> ExecutionReport {
        let worker = self.worker.await;
        self.done.cancel();
        if let Err(e) = self.monitor.await {
            warn!("Cancellation monitor terminated abnormally: {}", e);
        }

        let (exit_code, error) = match worker {
            Ok(Ok(code)) => (code, None),
            Ok(Err(e)) => (FAILED_EXIT_CODE, Some(e)),
            Err(e) => {
                self.tracker.transition(ExecutionState::Failed);
                (FAILED_EXIT_CODE, Some(ExecutionError::WorkerPanicked(e.to_string())))
            }
        };

        let state = self.tracker.state();
        self.tracker.transition(ExecutionState::Finished);

        let exit_code = if state == ExecutionState::Completed {
            exit_code
        } else {
            FAILED_EXIT_CODE
        };

        ExecutionReport {
            exit_code,
            state,
            kill_issued: self.tracker.kill_issued(),
            stdout: self.executor.stdout(),
            stderr: self.executor.stderr(),
            error,
        }
    }
}
