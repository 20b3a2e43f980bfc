//! Infrastructure layer for toolbridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: process spawning, command generation
//! strategies, binary lookup, working directories, descriptor files and
//! configuration file loading.

pub mod config;
pub mod descriptor;
pub mod generators;
pub mod locator;
pub mod process;
pub mod workspace;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigIssueCode, ConfigLoader, FileConfig, FileContainerConfig,
    FileExecutionConfig, FilePluginConfig, FileToolConfig, Severity,
};
pub use descriptor::{DescriptorFormat, DescriptorLoadError, load_descriptor, load_document};
pub use generators::{
    ContainerGenerator, GeneratorRegistry, MountTable, ParamFileGenerator, PlainCliGenerator,
};
pub use locator::ConfiguredBinaryLocator;
pub use process::{LocalExecutorFactory, LocalProcessExecutor};
pub use workspace::{GlobOutputRelocator, LocalWorkspaceProvider, WorkingDirectory};
