//! Binary resolution
//!
//! Lookup order:
//!
//! 1. an explicit path configured for `(tool, executable)`
//! 2. the executable itself, when it is already a path
//! 3. the plugin's binary directories
//! 4. `PATH`

use crate::config::FileConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toolbridge_application::BinaryLocator;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ConfiguredBinaryLocator {
    overrides: HashMap<(String, String), PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl ConfiguredBinaryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator for one tool as configured in the config file.
    pub fn for_tool(config: &FileConfig, tool: &str, executable: &str) -> Self {
        let mut locator = Self::new().with_search_dirs(config.plugin.bin_dirs.clone());
        if let Some(path) = config.tools.get(tool).and_then(|t| t.executable.clone()) {
            locator = locator.with_executable(tool, executable, path);
        }
        locator
    }

    pub fn with_executable(
        mut self,
        tool: impl Into<String>,
        executable: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.overrides
            .insert((tool.into(), executable.into()), path.into());
        self
    }

    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs.extend(dirs);
        self
    }

    fn find_in_dirs(&self, executable: &str) -> Option<PathBuf> {
        let file_name = format!("{}{}", executable, std::env::consts::EXE_SUFFIX);
        self.search_dirs
            .iter()
            .flat_map(|dir| [dir.join(executable), dir.join(&file_name)])
            .find(|candidate| candidate.is_file())
    }
}

impl BinaryLocator for ConfiguredBinaryLocator {
    fn locate(&self, plugin_id: &str, tool_name: &str, executable_name: &str) -> Option<PathBuf> {
        let key = (tool_name.to_string(), executable_name.to_string());
        if let Some(path) = self.overrides.get(&key) {
            if path.is_file() {
                debug!("{}/{}: using configured {}", plugin_id, tool_name, path.display());
                return Some(path.clone());
            }
            warn!(
                "{}/{}: configured executable {} does not exist",
                plugin_id,
                tool_name,
                path.display()
            );
        }

        let as_path = Path::new(executable_name);
        if as_path.components().count() > 1 || as_path.is_absolute() {
            return as_path.is_file().then(|| as_path.to_path_buf());
        }

        if let Some(path) = self.find_in_dirs(executable_name) {
            debug!("{}/{}: found {}", plugin_id, tool_name, path.display());
            return Some(path);
        }

        which::which(executable_name).ok()
    }
}
