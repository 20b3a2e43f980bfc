//! [`ToolConfiguration`]: the parsed, compiled form of a tool descriptor.

use super::entities::{CliElement, Port, Relocator, ToolInfo};
use crate::core::error::DomainError;
use crate::mapping;
use crate::parameter::{Parameter, PortDirection, Scalar, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// Parameters, ports, CLI elements and relocators of one tool.
///
/// Built once per tool through [`ToolConfigurationBuilder`], which runs the
/// mapping compiler, so an existing configuration always has a well-formed
/// CLI section. Afterwards only parameter values (and port activity) change;
/// they are reset and re-bound before each invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolConfiguration {
    info: ToolInfo,
    /// Name of the descriptor's root node (not part of any path)
    root_name: String,
    /// Group path -> description, in document order
    groups: IndexMap<String, String>,
    parameters: IndexMap<String, Parameter>,
    ports: Vec<Port>,
    cli: Vec<CliElement>,
    relocators: Vec<Relocator>,
}

impl ToolConfiguration {
    pub fn builder(info: ToolInfo) -> ToolConfigurationBuilder {
        ToolConfigurationBuilder::new(info)
    }

    // ==================== Queries ====================

    pub fn info(&self) -> &ToolInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn groups(&self) -> &IndexMap<String, String> {
        &self.groups
    }

    /// All parameters (file parameters included) in document order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.get(key)
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn input_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    pub fn output_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }

    pub fn cli_elements(&self) -> &[CliElement] {
        &self.cli
    }

    pub fn relocators(&self) -> &[Relocator] {
        &self.relocators
    }

    /// Files currently bound to a port (empty when unbound or unknown).
    pub fn port_files(&self, name: &str) -> Vec<String> {
        self.parameters
            .get(name)
            .and_then(Parameter::string_values)
            .unwrap_or_default()
    }

    /// Whether a file parameter belongs to an optional output switched off.
    pub fn is_inactive_output(&self, key: &str) -> bool {
        self.port(key)
            .is_some_and(|p| p.is_output() && p.optional && !p.active)
    }

    // ==================== Mutation ====================

    /// Restore every parameter to its descriptor default and reactivate ports.
    pub fn reset(&mut self) {
        for parameter in self.parameters.values_mut() {
            parameter.reset();
        }
        for port in &mut self.ports {
            port.active = true;
        }
    }

    /// Bind a plain parameter from its string representation.
    ///
    /// File parameters are bound through [`bind_port`](Self::bind_port).
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), DomainError> {
        self.plain_parameter_mut(key)?.set_from_str(raw)
    }

    /// Bind a plain parameter from a list of raw items.
    pub fn set_values<S: AsRef<str>>(&mut self, key: &str, raw: &[S]) -> Result<(), DomainError> {
        self.plain_parameter_mut(key)?.set_from_strings(raw)
    }

    /// Bind a typed value to a plain parameter.
    pub fn set_typed(&mut self, key: &str, value: Value) -> Result<(), DomainError> {
        self.plain_parameter_mut(key)?.set_value(value)
    }

    /// Write file paths through a port into its file parameter.
    pub fn bind_port<S: AsRef<str>>(&mut self, name: &str, files: &[S]) -> Result<(), DomainError> {
        let is_list = self
            .port(name)
            .map(|p| p.is_list)
            .ok_or_else(|| DomainError::UnknownParameter(name.to_string()))?;
        let parameter = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| DomainError::UnknownParameter(name.to_string()))?;

        if files.is_empty() {
            parameter.clear();
            return Ok(());
        }
        let scalars: Vec<Scalar> = files
            .iter()
            .map(|f| Scalar::Text(f.as_ref().to_string()))
            .collect();
        if is_list {
            parameter.set_value(Value::List(scalars))
        } else if let [single] = scalars.as_slice() {
            parameter.set_value(Value::Scalar(single.clone()))
        } else {
            Err(DomainError::invalid_value(
                name,
                format!("{} files bound to a single-file port", files.len()),
            ))
        }
    }

    /// Switch an optional output port on or off.
    pub fn set_port_active(&mut self, name: &str, active: bool) -> Result<(), DomainError> {
        let port = self
            .ports
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| DomainError::UnknownParameter(name.to_string()))?;
        if !active && !(port.is_output() && port.optional) {
            return Err(DomainError::invalid_value(
                name,
                "only optional output ports can be deactivated",
            ));
        }
        port.active = active;
        Ok(())
    }

    /// Fail on the first non-optional parameter without a value.
    ///
    /// Outputs are exempt here; they are planned by the invoking layer.
    pub fn check_bound(&self) -> Result<(), DomainError> {
        for parameter in self.parameters.values() {
            let is_output = parameter.direction() == Some(PortDirection::Output);
            if !parameter.optional && !parameter.is_bound() && !is_output {
                return Err(DomainError::UnboundParameter(parameter.key.clone()));
            }
        }
        Ok(())
    }

    fn plain_parameter_mut(&mut self, key: &str) -> Result<&mut Parameter, DomainError> {
        let parameter = self
            .parameters
            .get_mut(key)
            .ok_or_else(|| DomainError::UnknownParameter(key.to_string()))?;
        if parameter.is_file() {
            return Err(DomainError::invalid_value(
                key,
                "file parameters are bound through their port",
            ));
        }
        Ok(parameter)
    }
}

/// Assembles a [`ToolConfiguration`]; [`build`](Self::build) compiles the
/// CLI section and rejects duplicate paths.
#[derive(Debug, Clone)]
pub struct ToolConfigurationBuilder {
    info: ToolInfo,
    root_name: String,
    groups: IndexMap<String, String>,
    parameters: Vec<Parameter>,
    ports: Vec<Port>,
    cli: Vec<CliElement>,
    relocators: Vec<Relocator>,
}

impl ToolConfigurationBuilder {
    pub fn new(info: ToolInfo) -> Self {
        Self {
            root_name: info.name.clone(),
            info,
            groups: IndexMap::new(),
            parameters: Vec::new(),
            ports: Vec::new(),
            cli: Vec::new(),
            relocators: Vec::new(),
        }
    }

    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    pub fn group(mut self, path: impl Into<String>, description: impl Into<String>) -> Self {
        self.groups.insert(path.into(), description.into());
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn cli_element(mut self, element: CliElement) -> Self {
        self.cli.push(element);
        self
    }

    pub fn relocator(mut self, relocator: Relocator) -> Self {
        self.relocators.push(relocator);
        self
    }

    pub fn build(self) -> Result<ToolConfiguration, DomainError> {
        let mut parameters = IndexMap::with_capacity(self.parameters.len());
        for parameter in self.parameters {
            if parameters.contains_key(&parameter.key) {
                return Err(DomainError::schema(format!(
                    "duplicate parameter path '{}'",
                    parameter.key
                )));
            }
            parameters.insert(parameter.key.clone(), parameter);
        }

        for port in &self.ports {
            match parameters.get(&port.name) {
                Some(parameter) if parameter.direction() == Some(port.direction) => {}
                _ => {
                    return Err(DomainError::schema(format!(
                        "port '{}' has no matching {} file parameter",
                        port.name, port.direction
                    )));
                }
            }
        }

        let cli = mapping::compile(&parameters, &self.ports, self.cli)?;

        Ok(ToolConfiguration {
            info: self.info,
            root_name: self.root_name,
            groups: self.groups,
            parameters,
            ports: self.ports,
            cli,
            relocators: self.relocators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{Bounds, ParameterKind};

    fn sample() -> ToolConfiguration {
        ToolConfiguration::builder(ToolInfo::new("Sorter"))
            .parameter(
                Parameter::new("1.in", ParameterKind::File { direction: PortDirection::Input })
                    .required(),
            )
            .port(Port::new("1.in", PortDirection::Input).with_extensions(["txt"]))
            .parameter(
                Parameter::new("1.out", ParameterKind::File { direction: PortDirection::Output })
                    .required(),
            )
            .port(Port::new("1.out", PortDirection::Output).with_extensions(["txt"]))
            .parameter(
                Parameter::new("1.log", ParameterKind::File { direction: PortDirection::Output }),
            )
            .port(Port::new("1.log", PortDirection::Output).with_extensions(["log"]))
            .parameter(
                Parameter::new("1.k", ParameterKind::Int { bounds: Bounds::new(1, 9) })
                    .with_default(Value::Scalar(Scalar::Int(3)))
                    .unwrap(),
            )
            .cli_element(CliElement::option("-in").with_mapping("1.in"))
            .cli_element(CliElement::option("-k").with_mapping("1.k"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_set_value_and_reset() {
        let mut config = sample();
        config.set_value("1.k", "5").unwrap();
        assert_eq!(config.parameter("1.k").unwrap().value_string().as_deref(), Some("5"));
        config.reset();
        assert_eq!(config.parameter("1.k").unwrap().value_string().as_deref(), Some("3"));
    }

    #[test]
    fn test_unknown_and_file_keys_rejected_by_set_value() {
        let mut config = sample();
        assert_eq!(
            config.set_value("1.nope", "1").unwrap_err(),
            DomainError::UnknownParameter("1.nope".to_string())
        );
        assert!(config.set_value("1.in", "/tmp/a.txt").is_err());
    }

    #[test]
    fn test_bind_port_writes_file_parameter() {
        let mut config = sample();
        config.bind_port("1.in", &["/data/a.txt"]).unwrap();
        assert_eq!(config.port_files("1.in"), vec!["/data/a.txt"]);
        assert!(config.bind_port("1.in", &["/a", "/b"]).is_err());
    }

    #[test]
    fn test_check_bound_requires_inputs_only() {
        let mut config = sample();
        assert_eq!(
            config.check_bound().unwrap_err(),
            DomainError::UnboundParameter("1.in".to_string())
        );
        config.bind_port("1.in", &["/data/a.txt"]).unwrap();
        assert!(config.check_bound().is_ok());
    }

    #[test]
    fn test_port_activity() {
        let mut config = sample();
        config.set_port_active("1.log", false).unwrap();
        assert!(config.is_inactive_output("1.log"));
        assert!(config.set_port_active("1.out", false).is_err());
        assert!(config.set_port_active("1.in", false).is_err());
        config.reset();
        assert!(!config.is_inactive_output("1.log"));
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let result = ToolConfiguration::builder(ToolInfo::new("Dup"))
            .parameter(Parameter::new("a", ParameterKind::String))
            .parameter(Parameter::new("a", ParameterKind::String))
            .build();
        assert!(matches!(result, Err(DomainError::SchemaValidation(_))));
    }

    #[test]
    fn test_port_without_parameter_rejected() {
        let result = ToolConfiguration::builder(ToolInfo::new("Orphan"))
            .port(Port::new("1.in", PortDirection::Input))
            .build();
        assert!(matches!(result, Err(DomainError::SchemaValidation(_))));
    }
}
