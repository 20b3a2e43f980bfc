//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! ([`PluginContext`], [`GeneratorKind`]) on demand.

mod container;
mod execution;
mod plugin;
mod tools;

pub use container::FileContainerConfig;
pub use execution::FileExecutionConfig;
pub use plugin::FilePluginConfig;
pub use tools::FileToolConfig;

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use toolbridge_application::{GeneratorKind, PluginContext};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub plugin: FilePluginConfig,
    pub execution: FileExecutionConfig,
    pub container: FileContainerConfig,
    /// Per-tool overrides keyed by tool name
    pub tools: BTreeMap<String, FileToolConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks enum values, the polling period, configured executables and
    /// that every tool running in a container has an image.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.execution.parse_generator().1);
        issues.extend(self.execution.poll_interval().1);

        let default_kind = self.execution.parse_generator().0;
        if default_kind == GeneratorKind::Container && self.container.images.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingContainerImage { tool: None },
                "execution.generator is 'container' but [container.images] is empty",
            ));
        }

        for (name, tool) in &self.tools {
            let (kind, tool_issues) = tool.parse_generator(name);
            issues.extend(tool_issues);

            if kind == Some(GeneratorKind::Container)
                && self.container.to_settings().image_for(name).is_none()
            {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingContainerImage {
                        tool: Some(name.clone()),
                    },
                    format!(
                        "tools.{}.generator is 'container' but no image is configured",
                        name
                    ),
                ));
            }

            if let Some(path) = &tool.executable
                && !path.is_file()
            {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingPath {
                        field: format!("tools.{}.executable", name),
                    },
                    format!(
                        "tools.{}.executable: {} does not exist, searching instead",
                        name,
                        path.display()
                    ),
                ));
            }
        }

        issues
    }

    /// Strategy for a tool: its own override, else the global default.
    pub fn generator_for(&self, tool: &str) -> GeneratorKind {
        self.tools
            .get(tool)
            .and_then(|config| config.parse_generator(tool).0)
            .unwrap_or_else(|| self.execution.parse_generator().0)
    }

    /// Build the invocation context of a tool.
    ///
    /// The working directory is left empty; the run use case fills it in.
    pub fn plugin_context(&self, tool: &str, executable: &str) -> PluginContext {
        let environment = self
            .tools
            .get(tool)
            .map(FileToolConfig::to_environment)
            .unwrap_or_default();

        PluginContext::new(&self.plugin.id, tool)
            .with_executable(executable)
            .with_environment(environment)
            .with_container(self.container.to_settings())
            .with_param_file_switch(&self.execution.param_file_switch)
            .with_debug(self.execution.debug)
            .with_poll_interval(self.execution.poll_interval().0)
    }
}
