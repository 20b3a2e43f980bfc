//! Descriptor file loading
//!
//! Descriptors are JSON (`.json`) or TOML (`.toml`) documents of the same
//! shape; the format is chosen by extension.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolbridge_domain::{DescriptorDocument, DomainError, ToolConfiguration, parse_document};
use tracing::debug;

/// On-disk encodings of a descriptor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Json,
    Toml,
}

impl DescriptorFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(DescriptorFormat::Json),
            "toml" => Some(DescriptorFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorFormat::Json => write!(f, "json"),
            DescriptorFormat::Toml => write!(f, "toml"),
        }
    }
}

/// Errors raised while loading a descriptor file
#[derive(Error, Debug)]
pub enum DescriptorLoadError {
    #[error("Failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported descriptor format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid descriptor {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

/// Read and decode a descriptor without validating it.
pub fn load_document(path: &Path) -> Result<DescriptorDocument, DescriptorLoadError> {
    let format = DescriptorFormat::from_path(path)
        .ok_or_else(|| DescriptorLoadError::UnsupportedFormat(path.to_path_buf()))?;
    let text = std::fs::read_to_string(path).map_err(|source| DescriptorLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Decoding {} descriptor {}", format, path.display());

    let decoded = match format {
        DescriptorFormat::Json => serde_json::from_str(&text).map_err(|e| e.to_string()),
        DescriptorFormat::Toml => toml::from_str(&text).map_err(|e| e.to_string()),
    };
    decoded.map_err(|message| DescriptorLoadError::Invalid {
        path: path.to_path_buf(),
        source: DomainError::schema(message),
    })
}

/// Load a descriptor file into a compiled [`ToolConfiguration`].
pub fn load_descriptor(path: &Path) -> Result<ToolConfiguration, DescriptorLoadError> {
    let document = load_document(path)?;
    parse_document(document).map_err(|source| DescriptorLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
