//! The [`Parameter`] entity

use super::value::{ParameterKind, PortDirection, Scalar, Value};
use crate::core::error::DomainError;
use serde::Serialize;

/// A typed, constrained value slot addressed by its dotted path.
///
/// The `value` is mutated per invocation; `default` keeps the value the
/// descriptor declared so that [`reset`](Self::reset) can restore it.
/// `None` means unbound: CLI generation treats it as absent, never as an
/// empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Dotted path from just below the descriptor root (e.g. `"1.algorithm.mode"`)
    pub key: String,
    /// Leaf name (last path segment)
    pub name: String,
    pub description: String,
    pub kind: ParameterKind,
    /// Whether the parameter holds an ordered list of values
    pub is_list: bool,
    pub optional: bool,
    pub advanced: bool,
    value: Option<Value>,
    default: Option<Value>,
}

impl Parameter {
    pub fn new(key: impl Into<String>, kind: ParameterKind) -> Self {
        let key = key.into();
        let name = key.rsplit('.').next().unwrap_or_default().to_string();
        Self {
            key,
            name,
            description: String::new(),
            kind,
            is_list: false,
            optional: true,
            advanced: false,
            value: None,
            default: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn as_list(mut self) -> Self {
        self.is_list = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    /// Set the descriptor default (also the current value).
    ///
    /// The value is checked against the kind; an invalid default is an error.
    pub fn with_default(mut self, value: Value) -> Result<Self, DomainError> {
        self.check(&value)?;
        self.default = Some(value.clone());
        self.value = Some(value);
        Ok(self)
    }

    // ==================== Queries ====================

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, ParameterKind::Bool)
    }

    /// A scalar boolean; it switches its option on or off. Boolean lists
    /// are emitted as values like any other list.
    pub fn is_flag(&self) -> bool {
        self.is_bool() && !self.is_list
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ParameterKind::File { .. })
    }

    pub fn direction(&self) -> Option<PortDirection> {
        match self.kind {
            ParameterKind::File { direction } => Some(direction),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }

    /// Ordered string values, or `None` when unbound.
    pub fn string_values(&self) -> Option<Vec<String>> {
        self.value.as_ref().map(Value::to_strings)
    }

    /// String representation for editing layers; lists are newline-separated.
    pub fn value_string(&self) -> Option<String> {
        self.string_values().map(|values| values.join("\n"))
    }

    // ==================== Mutation ====================

    /// Restore the descriptor default.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Bind a typed value after checking it against the kind and constraint.
    pub fn set_value(&mut self, value: Value) -> Result<(), DomainError> {
        self.check(&value)?;
        self.value = match value {
            Value::List(items) if items.is_empty() => None,
            other => Some(other),
        };
        Ok(())
    }

    /// Parse and bind the editing-layer string representation.
    ///
    /// Blank input unbinds the parameter. List parameters take one item per
    /// line, in order.
    pub fn set_from_str(&mut self, raw: &str) -> Result<(), DomainError> {
        if self.is_list {
            let items: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
            return self.set_from_strings(&items);
        }
        if raw.trim().is_empty() {
            self.value = None;
            return Ok(());
        }
        let scalar = self
            .kind
            .parse_scalar(raw)
            .map_err(|reason| DomainError::invalid_value(&self.key, reason))?;
        self.set_value(Value::Scalar(scalar))
    }

    /// Parse and bind a list of raw items (list parameters only).
    pub fn set_from_strings<S: AsRef<str>>(&mut self, raw: &[S]) -> Result<(), DomainError> {
        if !self.is_list {
            return match raw {
                [single] => self.set_from_str(single.as_ref()),
                [] => {
                    self.value = None;
                    Ok(())
                }
                _ => Err(DomainError::invalid_value(
                    &self.key,
                    format!("{} values given for a single-valued parameter", raw.len()),
                )),
            };
        }
        let items = raw
            .iter()
            .map(|item| self.kind.parse_scalar(item.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| DomainError::invalid_value(&self.key, reason))?;
        self.set_value(Value::List(items))
    }

    /// Check a value against list-ness, type and constraint.
    pub fn check(&self, value: &Value) -> Result<(), DomainError> {
        let items: Vec<&Scalar> = match (value, self.is_list) {
            (Value::Scalar(scalar), false) => vec![scalar],
            (Value::List(items), true) => items.iter().collect(),
            (Value::Scalar(_), true) => {
                return Err(DomainError::invalid_value(
                    &self.key,
                    "single value given for a list parameter",
                ));
            }
            (Value::List(_), false) => {
                return Err(DomainError::invalid_value(
                    &self.key,
                    "list given for a single-valued parameter",
                ));
            }
        };
        for item in items {
            self.kind
                .check_scalar(item)
                .map_err(|reason| DomainError::invalid_value(&self.key, reason))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::constraint::Bounds;

    fn int_param(restriction: &str) -> Parameter {
        Parameter::new(
            "1.algorithm.threshold",
            ParameterKind::Int {
                bounds: Bounds::parse(restriction).unwrap(),
            },
        )
    }

    #[test]
    fn test_name_is_last_segment() {
        assert_eq!(int_param("").name, "threshold");
        assert_eq!(Parameter::new("flat", ParameterKind::String).name, "flat");
    }

    #[test]
    fn test_set_from_str_enforces_bounds() {
        let mut param = int_param("1:10");
        param.set_from_str("7").unwrap();
        assert_eq!(param.value_string().as_deref(), Some("7"));

        let err = param.set_from_str("11").unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        // Failed binding keeps the previous value
        assert_eq!(param.value_string().as_deref(), Some("7"));
    }

    #[test]
    fn test_blank_unbinds() {
        let mut param = Parameter::new("name", ParameterKind::String);
        param.set_from_str("abc").unwrap();
        param.set_from_str("   ").unwrap();
        assert!(!param.is_bound());
        assert_eq!(param.string_values(), None);
    }

    #[test]
    fn test_list_string_round_trip() {
        let mut param = Parameter::new(
            "weights",
            ParameterKind::Double {
                bounds: Bounds::unbounded(),
            },
        )
        .as_list();
        param.set_from_str("1.50\n2\n\n-3.25").unwrap();
        let text = param.value_string().unwrap();
        assert_eq!(text, "1.5\n2\n-3.25");

        let mut copy = param.clone();
        copy.clear();
        copy.set_from_str(&text).unwrap();
        assert_eq!(copy.value(), param.value());
    }

    #[test]
    fn test_empty_list_is_unbound() {
        let mut param = Parameter::new("tags", ParameterKind::String).as_list();
        param.set_from_strings::<&str>(&[]).unwrap();
        assert!(!param.is_bound());
    }

    #[test]
    fn test_reset_restores_default() {
        let mut param = Parameter::new("mode", ParameterKind::Bool)
            .with_default(Value::Scalar(Scalar::Bool(false)))
            .unwrap();
        param.set_from_str("true").unwrap();
        assert_eq!(param.bool_value(), Some(true));
        param.reset();
        assert_eq!(param.bool_value(), Some(false));
    }

    #[test]
    fn test_list_shape_is_checked() {
        let mut param = Parameter::new("single", ParameterKind::String);
        let err = param
            .set_value(Value::List(vec![Scalar::Text("a".into())]))
            .unwrap_err();
        assert!(err.to_string().contains("list given"));

        assert!(param.set_from_strings(&["a", "b"]).is_err());
        param.set_from_strings(&["only"]).unwrap();
        assert_eq!(param.value_string().as_deref(), Some("only"));
    }
}
