//! Presentation layer for toolbridge
//!
//! This crate contains CLI definitions, output formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ConfigCommand, InspectArgs, OutputFormat, RunArgs};
pub use output::console::{ConsoleFormatter, RunSummary};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
