//! Process executor port
//!
//! One executor instance handles exactly one invocation:
//!
//! 1. [`prepare_execution`](ProcessExecutor::prepare_execution) resolves the
//!    executable, builds the environment and generates the arguments.
//! 2. [`execute`](ProcessExecutor::execute) spawns the child, drains both
//!    output streams and returns the exit code.
//! 3. [`kill`](ProcessExecutor::kill) may be called from another task while
//!    `execute` is pending.
//!
//! A non-zero exit code is returned, not raised; the invoking layer decides
//! whether it is a failure.

use super::command_generator::{CommandGenerator, GenerationError};
use crate::config::PluginContext;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use toolbridge_domain::ToolConfiguration;

/// Errors raised by a process executor
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("No executable '{executable}' found for tool '{tool}'")]
    NoExecutable { tool: String, executable: String },

    #[error("Command generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Execution failed: {source}")]
    ExecutionFailed {
        #[source]
        source: std::io::Error,
        stdout: Vec<String>,
        stderr: Vec<String>,
    },

    #[error("Executor used before prepare_execution")]
    NotPrepared,

    #[error("Execution worker terminated abnormally: {0}")]
    WorkerPanicked(String),
}

impl ExecutionError {
    /// Output captured before the failure, if any.
    pub fn captured_output(&self) -> Option<(&[String], &[String])> {
        match self {
            ExecutionError::ExecutionFailed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Resolve the executable and generate the command line.
    fn prepare_execution(
        &mut self,
        config: &ToolConfiguration,
        context: &PluginContext,
    ) -> Result<(), ExecutionError>;

    /// Program followed by its arguments, once prepared.
    fn command_line(&self) -> Option<Vec<String>>;

    /// Spawn, drain stdout/stderr and wait for exit.
    async fn execute(&self) -> Result<i32, ExecutionError>;

    /// Forcibly terminate the child.
    fn kill(&self);

    /// Captured stdout lines, in arrival order.
    fn stdout(&self) -> Vec<String>;

    /// Captured stderr lines, in arrival order.
    fn stderr(&self) -> Vec<String>;
}

/// Creates a fresh executor per invocation.
pub trait ExecutorFactory: Send + Sync {
    fn create(&self, generator: Arc<dyn CommandGenerator>) -> Box<dyn ProcessExecutor>;
}
