//! Per-invocation execution lifecycle

pub mod state;

pub use state::ExecutionState;
