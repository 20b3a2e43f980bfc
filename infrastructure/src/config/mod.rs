//! Configuration file loading for toolbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLBRIDGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolbridge.toml` or `./.toolbridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/toolbridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;
pub mod validation;

pub use file_config::{
    FileConfig, FileContainerConfig, FileExecutionConfig, FilePluginConfig, FileToolConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
