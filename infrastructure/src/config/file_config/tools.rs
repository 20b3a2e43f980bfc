//! Per-tool overrides from TOML (`[tools.<name>]` sections)

use super::execution::parse_generator_field;
use crate::config::validation::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use toolbridge_application::{GeneratorKind, ToolEnvironment};

/// Raw tool configuration from TOML
///
/// # Example
///
/// ```toml
/// [tools.FeatureFinder]
/// executable = "/opt/openms/bin/FeatureFinder"
/// generator = "param-file"
/// library_paths = ["/opt/openms/lib"]
/// runtime_bin_dir = "/opt/python3/bin"
///
/// [tools.FeatureFinder.env]
/// OPENMS_DATA_PATH = "${HOME}/openms/share"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolConfig {
    /// Absolute path of the executable, bypassing the search
    pub executable: Option<PathBuf>,
    /// Strategy override for this tool
    pub generator: Option<String>,
    /// Extra variables; `${VAR}` placeholders are expanded
    pub env: BTreeMap<String, String>,
    pub library_paths: Vec<PathBuf>,
    pub runtime_bin_dir: Option<PathBuf>,
}

impl FileToolConfig {
    pub fn parse_generator(&self, tool: &str) -> (Option<GeneratorKind>, Vec<ConfigIssue>) {
        match &self.generator {
            Some(value) => {
                let field = format!("tools.{}.generator", tool);
                let (kind, issues) = parse_generator_field(&field, value);
                (Some(kind), issues)
            }
            None => (None, vec![]),
        }
    }

    pub fn to_environment(&self) -> ToolEnvironment {
        ToolEnvironment {
            variables: self.env.clone(),
            library_paths: self.library_paths.clone(),
            runtime_bin_dir: self.runtime_bin_dir.clone(),
        }
    }
}
