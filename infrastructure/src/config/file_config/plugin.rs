//! Plugin identity from TOML (`[plugin]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw plugin configuration from TOML
///
/// # Example
///
/// ```toml
/// [plugin]
/// id = "imaging-tools"
/// bin_dirs = ["/opt/imaging/bin"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePluginConfig {
    /// Identifier passed to the binary locator
    pub id: String,
    /// Directories searched before `PATH`
    pub bin_dirs: Vec<PathBuf>,
}

impl Default for FilePluginConfig {
    fn default() -> Self {
        Self {
            id: "toolbridge".to_string(),
            bin_dirs: Vec::new(),
        }
    }
}
