//! Command-generation strategy identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a command-generation strategy.
///
/// Resolved once when a tool is loaded; the registry in the infrastructure
/// layer maps each kind to a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// Plain argument vector
    #[default]
    Cli,
    /// Parameters serialized to a file passed behind a switch
    ParamFile,
    /// Plain arguments run inside a container with mounted host directories
    Container,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::Cli,
        GeneratorKind::ParamFile,
        GeneratorKind::Container,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Cli => "cli",
            GeneratorKind::ParamFile => "param-file",
            GeneratorKind::Container => "container",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cli" | "plain" => Ok(GeneratorKind::Cli),
            "param-file" | "param_file" | "paramfile" => Ok(GeneratorKind::ParamFile),
            "container" | "docker" => Ok(GeneratorKind::Container),
            other => Err(format!(
                "unknown generator '{}' (expected one of: cli, param-file, container)",
                other
            )),
        }
    }
}
