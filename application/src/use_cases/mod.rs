//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cancellable;
pub mod port_binding;
pub mod run_tool;
