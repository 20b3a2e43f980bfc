//! Command construction
//!
//! The plain CLI algorithm lives here because every generation strategy
//! builds on it: the CLI strategy returns it as-is, the container strategy
//! rewrites its [`CommandArgument::File`] entries.

pub mod arguments;

pub use arguments::{CommandArgument, build_argument_strings, build_arguments};
