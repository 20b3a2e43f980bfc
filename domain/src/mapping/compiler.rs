//! CLI mapping compilation.
//!
//! Runs once when a descriptor is loaded. Every [`CliMapping`] reference
//! must resolve to a parameter path or a port name, and an element with
//! more than one mapping must not map a scalar boolean parameter (a flag
//! only switches its option on or off, it has no value to emit alongside
//! others). Boolean lists carry values and map like any other list.
//!
//! The element list is returned in declaration order; that order is the
//! order of the generated command line.
//!
//! [`CliMapping`]: crate::tool::CliMapping

use crate::core::error::DomainError;
use crate::parameter::Parameter;
use crate::tool::{CliElement, Port};
use indexmap::IndexMap;

/// Validate the CLI section against the parsed parameters and ports.
pub fn compile(
    parameters: &IndexMap<String, Parameter>,
    ports: &[Port],
    elements: Vec<CliElement>,
) -> Result<Vec<CliElement>, DomainError> {
    for (index, element) in elements.iter().enumerate() {
        let mapping_count = element.mappings.len();

        for mapping in &element.mappings {
            let reference = mapping.reference.as_str();
            let parameter = parameters.get(reference);
            let is_port = ports.iter().any(|p| p.name == reference);

            if parameter.is_none() && !is_port {
                return Err(DomainError::MissingReference {
                    element: element.label(index),
                    reference: reference.to_string(),
                });
            }

            if mapping_count > 1 && parameter.is_some_and(Parameter::is_flag) {
                return Err(DomainError::InvalidMapping {
                    element: element.label(index),
                    reference: reference.to_string(),
                    mapping_count,
                });
            }
        }
    }

    Ok(elements)
}
