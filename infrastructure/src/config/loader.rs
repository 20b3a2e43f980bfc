//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["toolbridge.toml", ".toolbridge.toml"];

/// Prefix of environment overrides, e.g. `TOOLBRIDGE_EXECUTION__DEBUG=true`
pub const ENV_PREFIX: &str = "TOOLBRIDGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TOOLBRIDGE_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolbridge.toml` or `./.toolbridge.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolbridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let global = Self::global_config_path().filter(|path| path.exists());
        let project = Self::project_config_path();
        Self::figment(
            global.as_deref(),
            project.as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File layers, lowest priority first.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project, explicit].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./toolbridge.toml or ./.toolbridge.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use toolbridge_application::GeneratorKind;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.execution.parse_generator().0, GeneratorKind::Cli);
        assert!(!config.execution.debug);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("toolbridge"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(
            &global,
            "[execution]\ngenerator = \"container\"\npoll_interval_ms = 50\n",
        )
        .unwrap();
        fs::write(&explicit, "[execution]\ngenerator = \"param-file\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&global), None, Some(&explicit))
            .extract()
            .unwrap();
        assert_eq!(config.execution.parse_generator().0, GeneratorKind::ParamFile);
        assert_eq!(config.execution.poll_interval_ms, 50);
        assert_eq!(config.execution.param_file_switch, "-ini");
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[execution]\npoll_interval_ms = \"soon\"\n").unwrap();

        let result: Result<FileConfig, _> = ConfigLoader::figment(None, None, Some(&path)).extract();
        assert!(result.is_err());
    }
}
