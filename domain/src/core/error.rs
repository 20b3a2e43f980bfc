//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while loading a descriptor, compiling its
/// CLI mapping, binding values, or building an argument vector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Descriptor does not conform to the schema: {0}")]
    SchemaValidation(String),

    #[error("Descriptor is missing required field '{0}'")]
    MissingField(String),

    #[error("CLI element '{element}' references unknown parameter or port '{reference}'")]
    MissingReference { element: String, reference: String },

    #[error(
        "CLI element '{element}' maps {mapping_count} references but '{reference}' is boolean"
    )]
    InvalidMapping {
        element: String,
        reference: String,
        mapping_count: usize,
    },

    #[error("CLI element '{element}' maps value lists of unequal length {lengths:?}")]
    LengthMismatch { element: String, lengths: Vec<usize> },

    #[error("Invalid value for parameter '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Required parameter '{0}' has no value")]
    UnboundParameter(String),
}

impl DomainError {
    pub fn schema(message: impl Into<String>) -> Self {
        DomainError::SchemaValidation(message.into())
    }

    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_display() {
        let error = DomainError::MissingReference {
            element: "-in".to_string(),
            reference: "1.input".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "CLI element '-in' references unknown parameter or port '1.input'"
        );
    }
}
