//! Invocation state machine.
//!
//! # State Transitions
//!
//! ```text
//! Idle ──> Preparing ──> Running ──> Completed ──> Finished
//!              │                └──> Killed    ──┘
//!              └──────────────────┴──> Failed    ──┘
//! ```
//!
//! Cancellation only has an effect while `Running`; a request observed in
//! any other state is a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    #[default]
    Idle,
    /// Resolving the executable and generating the command
    Preparing,
    /// Child process spawned
    Running,
    /// Child exited on its own (any exit code)
    Completed,
    /// Child terminated by a cancellation request
    Killed,
    /// Preparation or I/O failed, or the worker died
    Failed,
    /// Worker and monitor have both been joined
    Finished,
}

impl ExecutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Preparing => "preparing",
            ExecutionState::Running => "running",
            ExecutionState::Completed => "completed",
            ExecutionState::Killed => "killed",
            ExecutionState::Failed => "failed",
            ExecutionState::Finished => "finished",
        }
    }

    pub fn can_transition_to(&self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (Idle, Preparing)
                | (Preparing, Running)
                | (Preparing, Failed)
                | (Running, Completed)
                | (Running, Killed)
                | (Running, Failed)
                | (Completed, Finished)
                | (Killed, Finished)
                | (Failed, Finished)
        )
    }

    pub fn accepts_cancellation(&self) -> bool {
        matches!(self, ExecutionState::Running)
    }

    /// Outcome states reached before `Finished`.
    pub fn is_outcome(&self) -> bool {
        matches!(
            self,
            ExecutionState::Completed | ExecutionState::Killed | ExecutionState::Failed
        )
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            ExecutionState::Idle,
            ExecutionState::Preparing,
            ExecutionState::Running,
            ExecutionState::Completed,
            ExecutionState::Finished,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!ExecutionState::Idle.can_transition_to(ExecutionState::Running));
        assert!(!ExecutionState::Completed.can_transition_to(ExecutionState::Killed));
        assert!(!ExecutionState::Finished.can_transition_to(ExecutionState::Idle));
        assert!(!ExecutionState::Preparing.can_transition_to(ExecutionState::Killed));
    }

    #[test]
    fn test_cancellation_only_while_running() {
        assert!(ExecutionState::Running.accepts_cancellation());
        for state in [
            ExecutionState::Idle,
            ExecutionState::Preparing,
            ExecutionState::Completed,
            ExecutionState::Failed,
            ExecutionState::Finished,
        ] {
            assert!(!state.accepts_cancellation());
        }
    }
}
