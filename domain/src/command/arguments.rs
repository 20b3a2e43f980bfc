//! Argument-vector construction from compiled CLI elements.
//!
//! For each element, in declaration order:
//!
//! 1. No mappings: the fixed token is split on whitespace and every piece
//!    becomes one argument.
//! 2. A single scalar boolean mapping: the option is emitted iff the value
//!    is true.
//! 3. Otherwise every mapped parameter contributes a column of values
//!    (unset parameters and switched-off outputs are skipped). All columns
//!    must have the same length `n`; for each `i < n` the option is emitted
//!    followed by the `i`-th value of every column.

use crate::core::error::DomainError;
use crate::tool::{CliElement, ToolConfiguration};
use serde::Serialize;
use std::fmt;

/// One generated argument.
///
/// File arguments are kept distinct so that strategies which relocate
/// paths (containers) can rewrite them without guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CommandArgument {
    Literal(String),
    File(String),
}

impl CommandArgument {
    pub fn as_str(&self) -> &str {
        match self {
            CommandArgument::Literal(text) | CommandArgument::File(text) => text,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, CommandArgument::File(_))
    }

    pub fn into_string(self) -> String {
        match self {
            CommandArgument::Literal(text) | CommandArgument::File(text) => text,
        }
    }
}

impl fmt::Display for CommandArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the typed argument vector for the current parameter values.
pub fn build_arguments(config: &ToolConfiguration) -> Result<Vec<CommandArgument>, DomainError> {
    let mut arguments = Vec::new();
    for (index, element) in config.cli_elements().iter().enumerate() {
        append_element(config, element, index, &mut arguments)?;
    }
    Ok(arguments)
}

/// Plain string form of [`build_arguments`].
pub fn build_argument_strings(config: &ToolConfiguration) -> Result<Vec<String>, DomainError> {
    Ok(build_arguments(config)?
        .into_iter()
        .map(CommandArgument::into_string)
        .collect())
}

fn append_element(
    config: &ToolConfiguration,
    element: &CliElement,
    index: usize,
    out: &mut Vec<CommandArgument>,
) -> Result<(), DomainError> {
    let option = element.option_token();

    if element.mappings.is_empty() {
        if let Some(token) = option {
            out.extend(
                token
                    .split_whitespace()
                    .map(|piece| CommandArgument::Literal(piece.to_string())),
            );
        }
        return Ok(());
    }

    if let [mapping] = element.mappings.as_slice()
        && let Some(parameter) = config.parameter(&mapping.reference)
        && parameter.is_flag()
    {
        if parameter.bool_value() == Some(true)
            && let Some(token) = option
        {
            out.push(CommandArgument::Literal(token.to_string()));
        }
        return Ok(());
    }

    let mut columns: Vec<Vec<CommandArgument>> = Vec::new();
    for mapping in &element.mappings {
        let reference = mapping.reference.as_str();
        let Some(parameter) = config.parameter(reference) else {
            continue;
        };
        if config.is_inactive_output(reference) {
            continue;
        }
        let Some(values) = parameter.string_values() else {
            continue;
        };
        let wrap: fn(String) -> CommandArgument = if parameter.is_file() {
            CommandArgument::File
        } else {
            CommandArgument::Literal
        };
        columns.push(values.into_iter().map(wrap).collect());
    }

    let Some(first) = columns.first() else {
        return Ok(());
    };
    let length = first.len();
    if columns.iter().any(|column| column.len() != length) {
        return Err(DomainError::LengthMismatch {
            element: element.label(index),
            lengths: columns.iter().map(Vec::len).collect(),
        });
    }

    for i in 0..length {
        if let Some(token) = option {
            out.push(CommandArgument::Literal(token.to_string()));
        }
        for column in &columns {
            out.push(column[i].clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{Parameter, ParameterKind, PortDirection, Scalar, Value};
    use crate::tool::{Port, ToolInfo};

    fn config(elements: Vec<CliElement>) -> ToolConfiguration {
        let mut builder = ToolConfiguration::builder(ToolInfo::new("Demo"))
            .parameter(Parameter::new("o", ParameterKind::Bool))
            .parameter(Parameter::new("flags", ParameterKind::Bool).as_list())
            .parameter(Parameter::new("a", ParameterKind::String).as_list())
            .parameter(Parameter::new("b", ParameterKind::String).as_list())
            .parameter(Parameter::new("name", ParameterKind::String))
            .parameter(Parameter::new(
                "in",
                ParameterKind::File {
                    direction: PortDirection::Input,
                },
            ))
            .port(Port::new("in", PortDirection::Input))
            .parameter(Parameter::new(
                "log",
                ParameterKind::File {
                    direction: PortDirection::Output,
                },
            ))
            .port(Port::new("log", PortDirection::Output));
        for element in elements {
            builder = builder.cli_element(element);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_bool_flag_emitted_only_when_true() {
        let mut config = config(vec![CliElement::option("-o").with_mapping("o")]);
        config
            .set_typed("o", Value::Scalar(Scalar::Bool(true)))
            .unwrap();
        assert_eq!(build_argument_strings(&config).unwrap(), vec!["-o"]);

        config.set_value("o", "false").unwrap();
        assert!(build_argument_strings(&config).unwrap().is_empty());

        config.set_value("o", "").unwrap();
        assert!(build_argument_strings(&config).unwrap().is_empty());
    }

    #[test]
    fn test_bool_list_emits_values() {
        let mut config = config(vec![CliElement::option("-b").with_mapping("flags")]);
        config.set_values("flags", &["true", "false"]).unwrap();
        assert_eq!(
            build_argument_strings(&config).unwrap(),
            vec!["-b", "true", "-b", "false"]
        );
    }

    #[test]
    fn test_lists_emitted_per_index() {
        let mut config = config(vec![
            CliElement::option("-p").with_mapping("a").with_mapping("b"),
        ]);
        config.set_values("a", &["a", "b"]).unwrap();
        config.set_values("b", &["x", "y"]).unwrap();
        assert_eq!(
            build_argument_strings(&config).unwrap(),
            vec!["-p", "a", "x", "-p", "b", "y"]
        );
    }

    #[test]
    fn test_unequal_lengths_fail() {
        let mut config = config(vec![
            CliElement::option("-p").with_mapping("a").with_mapping("b"),
        ]);
        config.set_values("a", &["1", "2"]).unwrap();
        config.set_values("b", &["1", "2", "3"]).unwrap();
        assert_eq!(
            build_arguments(&config).unwrap_err(),
            DomainError::LengthMismatch {
                element: "-p".to_string(),
                lengths: vec![2, 3],
            }
        );
    }

    #[test]
    fn test_fixed_token_split_on_whitespace() {
        let config = config(vec![CliElement::option("run  --fast")]);
        assert_eq!(
            build_argument_strings(&config).unwrap(),
            vec!["run", "--fast"]
        );
    }

    #[test]
    fn test_unset_parameters_are_absent() {
        let mut config = config(vec![
            CliElement::option("-n").with_mapping("name"),
            CliElement::option("-a").with_mapping("a").with_mapping("name"),
        ]);
        assert!(build_argument_strings(&config).unwrap().is_empty());

        config.set_values("a", &["only"]).unwrap();
        assert_eq!(build_argument_strings(&config).unwrap(), vec!["-a", "only"]);
    }

    #[test]
    fn test_positional_values_without_option() {
        let mut config = config(vec![CliElement::new().with_mapping("name")]);
        config.set_value("name", "value with space").unwrap();
        assert_eq!(
            build_argument_strings(&config).unwrap(),
            vec!["value with space"]
        );
    }

    #[test]
    fn test_file_arguments_are_tagged() {
        let mut config = config(vec![
            CliElement::option("-in").with_mapping("in"),
            CliElement::option("-log").with_mapping("log"),
        ]);
        config.bind_port("in", &["/data/a.txt"]).unwrap();
        config.bind_port("log", &["/work/run.log"]).unwrap();
        let args = build_arguments(&config).unwrap();
        assert_eq!(
            args,
            vec![
                CommandArgument::Literal("-in".into()),
                CommandArgument::File("/data/a.txt".into()),
                CommandArgument::Literal("-log".into()),
                CommandArgument::File("/work/run.log".into()),
            ]
        );

        config.set_port_active("log", false).unwrap();
        let args = build_argument_strings(&config).unwrap();
        assert_eq!(args, vec!["-in", "/data/a.txt"]);
    }
}
