//! Command generator port
//!
//! A generation strategy turns a populated [`ToolConfiguration`] into the
//! arguments of the host-side command. Strategies may write side files
//! into the working directory (parameter files).
//!
//! | Strategy | Host program | Arguments |
//! |----------|--------------|-----------|
//! | cli | tool executable | plain CLI algorithm |
//! | param-file | tool executable | `<switch> <file>` |
//! | container | container runtime | `run ... <image> <executable> <args>` |

use crate::config::{GeneratorKind, PluginContext};
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolbridge_domain::{DomainError, ToolConfiguration};

/// Errors raised while generating a command
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("No container image configured for tool '{0}'")]
    NoContainerImage(String),

    #[error("Failed to write parameter file {path}: {source}")]
    ParameterFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize parameter file: {0}")]
    Serialization(String),

    #[error("Cannot mount directory of {path}: {source}")]
    Mount {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Strategy-polymorphic command generation.
pub trait CommandGenerator: Send + Sync {
    fn kind(&self) -> GeneratorKind;

    /// Name of the program spawned on the host.
    fn host_program(&self, context: &PluginContext) -> String {
        context.executable_name.clone()
    }

    /// Variables the strategy adds to the process environment.
    fn environment(&self, _context: &PluginContext) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Build the argument vector (without the program itself).
    ///
    /// All declared inputs are bound at this point; unbound optional
    /// parameters are absent from the result.
    fn generate(
        &self,
        config: &ToolConfiguration,
        context: &PluginContext,
        working_dir: &Path,
    ) -> Result<Vec<String>, GenerationError>;
}
