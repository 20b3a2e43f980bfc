//! Execution settings from TOML (`[execution]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use toolbridge_application::GeneratorKind;
use toolbridge_application::config::DEFAULT_POLL_INTERVAL;

/// Raw execution configuration from TOML
///
/// # Example
///
/// ```toml
/// [execution]
/// generator = "cli"          # "cli", "param-file" or "container"
/// poll_interval_ms = 100
/// debug = false              # keep working directories
/// work_dir = "/scratch/toolbridge"
/// param_file_switch = "-ini"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub generator: String,
    /// Cancellation polling period in milliseconds
    pub poll_interval_ms: u64,
    pub debug: bool,
    /// Base directory for per-run working directories (system temp if unset)
    pub work_dir: Option<PathBuf>,
    pub param_file_switch: String,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Cli.as_str().to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            debug: false,
            work_dir: None,
            param_file_switch: "-ini".to_string(),
        }
    }
}

impl FileExecutionConfig {
    /// Parse the generator name, falling back to `cli` with a warning.
    pub fn parse_generator(&self) -> (GeneratorKind, Vec<ConfigIssue>) {
        parse_generator_field("execution.generator", &self.generator)
    }

    /// Polling period; zero is replaced by the default.
    pub fn poll_interval(&self) -> (Duration, Vec<ConfigIssue>) {
        if self.poll_interval_ms == 0 {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "execution.poll_interval_ms".to_string(),
                },
                format!(
                    "execution.poll_interval_ms: must be positive, falling back to {}",
                    DEFAULT_POLL_INTERVAL.as_millis()
                ),
            );
            return (DEFAULT_POLL_INTERVAL, vec![issue]);
        }
        (Duration::from_millis(self.poll_interval_ms), vec![])
    }
}

pub(super) fn parse_generator_field(field: &str, value: &str) -> (GeneratorKind, Vec<ConfigIssue>) {
    match value.parse::<GeneratorKind>() {
        Ok(kind) => (kind, vec![]),
        Err(_) => {
            let issue = ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    valid_values: GeneratorKind::ALL
                        .iter()
                        .map(|kind| kind.as_str().to_string())
                        .collect(),
                },
                format!("{}: unknown value '{}', falling back to 'cli'", field, value),
            );
            (GeneratorKind::Cli, vec![issue])
        }
    }
}
