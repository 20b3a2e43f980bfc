//! Tool domain module
//!
//! A [`ToolConfiguration`] is what a tool descriptor becomes after parsing
//! and mapping compilation:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ descriptor   │──▶│ parse        │──▶│ ToolConfiguration│
//! │ (json/toml)  │   │ + compile    │   │ (values mutable) │
//! └──────────────┘   └──────────────┘   └────────┬─────────┘
//!                                                │ per invocation
//!                                                ▼
//!                                       bind values → build arguments
//! ```
//!
//! # Key Types
//!
//! - [`ToolInfo`]: name, version, category, manual text, executable name
//! - [`Port`]: input/output data slot backed by a file parameter
//! - [`CliElement`] / [`CliMapping`]: how parameters become arguments
//! - [`Relocator`]: post-execution output relocation hint

pub mod configuration;
pub mod entities;

pub use configuration::{ToolConfiguration, ToolConfigurationBuilder};
pub use entities::{CliElement, CliMapping, Port, Relocator, ToolInfo};
