//! Application-level configuration.
//!
//! This module provides the per-invocation settings handed to generators
//! and executors:
//!
//! - [`PluginContext`]: plugin/tool identity, working directory, environment
//! - [`GeneratorKind`]: which command-generation strategy a tool uses

pub mod generator_kind;
pub mod plugin_context;

pub use generator_kind::GeneratorKind;
pub use plugin_context::{ContainerSettings, DEFAULT_POLL_INTERVAL, PluginContext, ToolEnvironment};
