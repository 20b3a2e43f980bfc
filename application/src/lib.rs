//! Application layer for toolbridge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ContainerSettings, GeneratorKind, PluginContext, ToolEnvironment};
pub use ports::{
    binary_locator::BinaryLocator,
    cancellation::{CancellationSignal, NeverCancelled},
    command_generator::{CommandGenerator, GenerationError},
    output_relocator::{NoRelocation, OutputRelocator},
    process_executor::{ExecutionError, ExecutorFactory, ProcessExecutor},
    progress::{ExecutionProgress, NoProgress},
    workspace::{Workspace, WorkspaceProvider},
};
pub use use_cases::cancellable::{
    CancellableExecution, ExecutionHandle, ExecutionReport, ExecutionTracker, FAILED_EXIT_CODE,
};
pub use use_cases::port_binding::PortBindingError;
pub use use_cases::run_tool::{RunToolError, RunToolInput, RunToolOutput, RunToolUseCase};
