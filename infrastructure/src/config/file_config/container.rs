//! Container runtime settings from TOML (`[container]` section)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use toolbridge_application::ContainerSettings;

/// Raw container configuration from TOML
///
/// # Example
///
/// ```toml
/// [container]
/// runtime = "docker"
/// mount_root = "/data"
///
/// [container.images]
/// FeatureFinder = "registry.example.org/ff:2.1"
///
/// [container.machine_env]
/// DOCKER_HOST = "tcp://192.168.99.100:2376"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileContainerConfig {
    pub runtime: String,
    pub mount_root: String,
    /// Tool name -> image
    pub images: HashMap<String, String>,
    /// Variables of a virtualized container host
    pub machine_env: BTreeMap<String, String>,
}

impl Default for FileContainerConfig {
    fn default() -> Self {
        let settings = ContainerSettings::default();
        Self {
            runtime: settings.runtime,
            mount_root: settings.mount_root,
            images: HashMap::new(),
            machine_env: BTreeMap::new(),
        }
    }
}

impl FileContainerConfig {
    pub fn to_settings(&self) -> ContainerSettings {
        ContainerSettings {
            runtime: self.runtime.clone(),
            images: self.images.clone(),
            machine_env: self.machine_env.clone(),
            mount_root: self.mount_root.clone(),
        }
    }
}
