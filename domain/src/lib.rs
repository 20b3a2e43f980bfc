//! Domain layer for toolbridge
//!
//! This crate contains the tool model and the pure algorithms that operate
//! on it. It has no dependencies on process execution, files on disk, or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool descriptor
//!
//! A declarative document describing a command-line tool: a tree of typed
//! parameters (some of them file ports) and a CLI section that maps
//! parameters onto arguments. Parsing it yields a [`ToolConfiguration`].
//!
//! ## Argument generation
//!
//! Once per invocation, after values are bound, [`build_arguments`] walks
//! the compiled CLI elements in declaration order and produces the
//! argument vector.

pub mod command;
pub mod core;
pub mod descriptor;
pub mod execution;
pub mod mapping;
pub mod parameter;
pub mod tool;

// Re-export commonly used types
pub use command::{CommandArgument, build_argument_strings, build_arguments};
pub use core::error::DomainError;
pub use descriptor::{DescriptorDocument, parse, parse_document, to_document};
pub use execution::ExecutionState;
pub use parameter::{Bounds, Parameter, ParameterKind, PortDirection, Scalar, Value};
pub use tool::{CliElement, CliMapping, Port, Relocator, ToolConfiguration, ToolInfo};
