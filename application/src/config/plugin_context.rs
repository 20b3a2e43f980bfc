//! Per-invocation plugin context.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

/// How often the cancellation monitor polls its signal.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything a generator and an executor need besides the tool itself.
///
/// Built by the invoking layer from the loaded configuration; the working
/// directory is filled in per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginContext {
    /// Identifier of the plugin that ships the tool
    pub plugin_id: String,
    pub tool_name: String,
    /// Name of the executable to resolve (usually the tool name)
    pub executable_name: String,
    /// Exclusive per-invocation directory; also the child's cwd
    pub working_dir: PathBuf,
    pub environment: ToolEnvironment,
    pub container: ContainerSettings,
    /// Switch placed before the parameter file path
    pub param_file_switch: String,
    /// Keep the working directory after the run
    pub debug: bool,
    pub poll_interval: Duration,
}

impl PluginContext {
    pub fn new(plugin_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self {
            plugin_id: plugin_id.into(),
            executable_name: tool_name.clone(),
            tool_name,
            working_dir: PathBuf::new(),
            environment: ToolEnvironment::default(),
            container: ContainerSettings::default(),
            param_file_switch: "-ini".to_string(),
            debug: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable_name = executable.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_environment(mut self, environment: ToolEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_container(mut self, container: ContainerSettings) -> Self {
        self.container = container;
        self
    }

    pub fn with_param_file_switch(mut self, switch: impl Into<String>) -> Self {
        self.param_file_switch = switch.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Tool-specific process environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvironment {
    /// Extra variables; values may contain `${VAR}` placeholders
    pub variables: BTreeMap<String, String>,
    /// Shared-library search paths appended to the platform's loader variable
    pub library_paths: Vec<PathBuf>,
    /// Binary directory of a runtime the tool needs, appended to the search path
    pub runtime_bin_dir: Option<PathBuf>,
}

impl ToolEnvironment {
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_paths.push(path.into());
        self
    }

    pub fn with_runtime_bin_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_bin_dir = Some(path.into());
        self
    }
}

/// Settings of the containerized strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSettings {
    /// Container runtime executable (e.g. `docker`, `podman`)
    pub runtime: String,
    /// Tool name -> image
    pub images: HashMap<String, String>,
    /// Variables activating a virtualized container host, where one is needed
    pub machine_env: BTreeMap<String, String>,
    /// In-container directory under which host directories are mounted
    pub mount_root: String,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            images: HashMap::new(),
            machine_env: BTreeMap::new(),
            mount_root: "/data".to_string(),
        }
    }
}

impl ContainerSettings {
    pub fn with_image(mut self, tool: impl Into<String>, image: impl Into<String>) -> Self {
        self.images.insert(tool.into(), image.into());
        self
    }

    pub fn image_for(&self, tool: &str) -> Option<&str> {
        self.images
            .get(tool)
            .map(String::as_str)
            .filter(|image| !image.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let context = PluginContext::new("org.example.tools", "FileFilter");
        assert_eq!(context.executable_name, "FileFilter");
        assert_eq!(context.param_file_switch, "-ini");
        assert_eq!(context.poll_interval, Duration::from_millis(100));
        assert_eq!(context.container.runtime, "docker");
        assert!(!context.debug);
    }

    #[test]
    fn test_image_lookup_ignores_blank() {
        let settings = ContainerSettings::default()
            .with_image("FileFilter", "example/filefilter:2.1")
            .with_image("Blank", "  ");
        assert_eq!(settings.image_for("FileFilter"), Some("example/filefilter:2.1"));
        assert_eq!(settings.image_for("Blank"), None);
        assert_eq!(settings.image_for("Other"), None);
    }
}
