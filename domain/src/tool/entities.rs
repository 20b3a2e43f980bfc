//! Tool domain entities

use crate::parameter::PortDirection;
use serde::Serialize;

/// Descriptive metadata of a wrapped tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolInfo {
    /// Tool name; also the key for per-tool plugin configuration
    pub name: String,
    pub version: String,
    pub category: String,
    pub description: String,
    /// Long-form manual text
    pub manual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docurl: Option<String>,
    /// Name of the executable to resolve (defaults to the tool name)
    pub executable: String,
}

impl ToolInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            executable: name.clone(),
            name,
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }
}

/// An input or output data port.
///
/// The port name equals the key of the file [`Parameter`](crate::parameter::Parameter)
/// holding its bound paths; the configuration resolves one from the other by
/// that shared key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub name: String,
    pub description: String,
    pub direction: PortDirection,
    /// File list (`true`) or single file (`false`)
    pub is_list: bool,
    pub optional: bool,
    /// Accepted file extensions, without wildcard prefix
    pub extensions: Vec<String>,
    /// Inactive optional outputs are left out of generated commands
    pub active: bool,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            direction,
            is_list: false,
            optional: true,
            extensions: Vec::new(),
            active: true,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// Extension used when planning output file names.
    pub fn primary_extension(&self) -> Option<&str> {
        self.extensions.first().map(String::as_str)
    }
}

/// A binding from a [`CliElement`] to a parameter path or port name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliMapping {
    pub reference: String,
}

impl CliMapping {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// One unit of argument generation: a fixed token, a boolean flag, or an
/// option followed by mapped values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliElement {
    /// Fixed token or option identifier (e.g. `"-in"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    pub is_list: bool,
    pub required: bool,
    pub mappings: Vec<CliMapping>,
}

impl CliElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element with an option token and no mappings yet.
    pub fn option(option: impl Into<String>) -> Self {
        Self {
            option: Some(option.into()),
            ..Default::default()
        }
    }

    pub fn with_mapping(mut self, reference: impl Into<String>) -> Self {
        self.mappings.push(CliMapping::new(reference));
        self
    }

    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Option token with surrounding whitespace removed; `None` when blank.
    pub fn option_token(&self) -> Option<&str> {
        self.option
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Human-readable label used in error messages.
    pub fn label(&self, index: usize) -> String {
        match self.option_token() {
            Some(token) => token.to_string(),
            None => format!("#{}", index),
        }
    }
}

/// Annotates where an output ends up after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relocator {
    /// Output port the relocated files belong to
    pub reference: String,
    /// Glob pattern, relative to the working directory
    pub pattern: String,
}

impl Relocator {
    pub fn new(reference: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            pattern: pattern.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_info_defaults_executable_to_name() {
        let info = ToolInfo::new("FileFilter");
        assert_eq!(info.executable, "FileFilter");
        let info = info.with_executable("filefilter.sh");
        assert_eq!(info.executable, "filefilter.sh");
    }

    #[test]
    fn test_cli_element_label() {
        assert_eq!(CliElement::option(" -in ").label(3), "-in");
        assert_eq!(CliElement::new().label(3), "#3");
        assert_eq!(CliElement::option("  ").option_token(), None);
    }

    #[test]
    fn test_port_primary_extension() {
        let port = Port::new("1.out", PortDirection::Output).with_extensions(["mzML", "mzXML"]);
        assert_eq!(port.primary_extension(), Some("mzML"));
        assert!(port.is_output());
        assert!(port.active);
    }
}
