//! Progress notification port
//!
//! Defines the interface for reporting progress of a tool invocation.

use toolbridge_domain::ExecutionState;

/// Callback for progress updates during a tool run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ExecutionProgress: Send + Sync {
    /// Called when the invocation moves to a new state
    fn on_state_change(&self, tool: &str, state: ExecutionState);

    /// Called once the command line is known, before spawning
    fn on_command(&self, _command_line: &[String]) {}

    /// Called after both worker and monitor have been joined
    fn on_finished(&self, _tool: &str, _exit_code: i32) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ExecutionProgress for NoProgress {
    fn on_state_change(&self, _tool: &str, _state: ExecutionState) {}
}
