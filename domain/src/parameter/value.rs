//! Parameter kinds and typed values.
//!
//! A [`ParameterKind`] carries the constraint that belongs to it, so bounds
//! only ever exist for numeric kinds and allowed values only for choices.

use super::constraint::{Bounds, format_number};
use serde::Serialize;
use std::fmt;

/// Direction of a file-backed parameter's port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
        }
    }

    /// Descriptor tag that marks a node as a port of this direction.
    pub fn tag(&self) -> &'static str {
        match self {
            PortDirection::Input => "input file",
            PortDirection::Output => "output file",
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value type of a parameter together with its constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Int { bounds: Bounds<i64> },
    Double { bounds: Bounds<f64> },
    String,
    Bool,
    StringChoice { choices: Vec<String> },
    File { direction: PortDirection },
}

impl ParameterKind {
    /// Type token written back to descriptors and parameter files.
    pub fn type_token(&self) -> &'static str {
        match self {
            ParameterKind::Int { .. } => "int",
            ParameterKind::Double { .. } => "double",
            _ => "string",
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::Int { .. } => "int",
            ParameterKind::Double { .. } => "double",
            ParameterKind::String => "string",
            ParameterKind::Bool => "bool",
            ParameterKind::StringChoice { .. } => "choice",
            ParameterKind::File { .. } => "file",
        }
    }

    /// Parse one raw token into a scalar of this kind (no constraint check).
    pub fn parse_scalar(&self, raw: &str) -> Result<Scalar, String> {
        let trimmed = raw.trim();
        match self {
            ParameterKind::Int { .. } => trimmed
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| format!("'{}' is not an integer", trimmed)),
            ParameterKind::Double { .. } => trimmed
                .parse::<f64>()
                .map(Scalar::Double)
                .map_err(|_| format!("'{}' is not a number", trimmed)),
            ParameterKind::Bool => match trimmed {
                "true" => Ok(Scalar::Bool(true)),
                "false" => Ok(Scalar::Bool(false)),
                other => Err(format!("'{}' is neither 'true' nor 'false'", other)),
            },
            ParameterKind::String
            | ParameterKind::StringChoice { .. }
            | ParameterKind::File { .. } => Ok(Scalar::Text(raw.to_string())),
        }
    }

    /// Check a scalar against this kind's type and constraint.
    pub fn check_scalar(&self, scalar: &Scalar) -> Result<(), String> {
        match (self, scalar) {
            (ParameterKind::Int { bounds }, Scalar::Int(v)) => {
                if bounds.contains(*v) {
                    Ok(())
                } else {
                    Err(format!(
                        "{} is outside bounds [{}]",
                        v,
                        bounds.to_restriction()
                    ))
                }
            }
            (ParameterKind::Double { bounds }, Scalar::Double(v)) => {
                if v.is_nan() {
                    Err("NaN is not a valid value".to_string())
                } else if bounds.contains(*v) {
                    Ok(())
                } else {
                    Err(format!(
                        "{} is outside bounds [{}]",
                        format_number(*v),
                        bounds.to_restriction()
                    ))
                }
            }
            (ParameterKind::StringChoice { choices }, Scalar::Text(v)) => {
                if choices.iter().any(|c| c == v) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not one of [{}]", v, choices.join(", ")))
                }
            }
            (ParameterKind::String, Scalar::Text(_))
            | (ParameterKind::File { .. }, Scalar::Text(_))
            | (ParameterKind::Bool, Scalar::Bool(_)) => Ok(()),
            (kind, scalar) => Err(format!(
                "{} value given for {} parameter",
                scalar.type_name(),
                kind.type_name()
            )),
        }
    }

    /// Restriction string re-derived from the constraint.
    pub fn restriction(&self) -> String {
        match self {
            ParameterKind::Int { bounds } => bounds.to_restriction(),
            ParameterKind::Double { bounds } => bounds.to_restriction(),
            ParameterKind::StringChoice { choices } => choices.join(","),
            ParameterKind::Bool => "true,false".to_string(),
            ParameterKind::String | ParameterKind::File { .. } => String::new(),
        }
    }
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Double(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "int",
            Scalar::Double(_) => "double",
            Scalar::Bool(_) => "bool",
            Scalar::Text(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", format_number(*v)),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Text(v) => write!(f, "{}", v),
        }
    }
}

/// The bound value of a parameter: one scalar or an ordered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl Value {
    /// String form of every element, in order.
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            Value::Scalar(scalar) => vec![scalar.to_string()],
            Value::List(items) => items.iter().map(Scalar::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(v)) => Some(*v),
            _ => None,
        }
    }
}
