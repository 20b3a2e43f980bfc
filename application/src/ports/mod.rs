//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod binary_locator;
pub mod cancellation;
pub mod command_generator;
pub mod output_relocator;
pub mod process_executor;
pub mod progress;
pub mod workspace;
