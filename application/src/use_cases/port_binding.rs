//! Port binding and output planning.
//!
//! The workflow side supplies files per input port and expects files per
//! output port. Outputs the caller did not name are planned here:
//!
//! - a single-file output gets one file, `<port>.<ext>`
//! - a list output gets one file per element of the shortest bound
//!   list-typed input (1 when there is none), `<port>_<i>.<ext>`
//!
//! `<ext>` is the port's first declared extension.

use std::collections::BTreeMap;
use std::path::Path;
use toolbridge_domain::{DomainError, Port, PortDirection, ToolConfiguration};

/// Errors raised while binding files to ports
#[derive(thiserror::Error, Debug)]
pub enum PortBindingError {
    #[error("Unknown {direction} port '{name}'")]
    UnknownPort {
        name: String,
        direction: PortDirection,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Bind caller-supplied input files.
pub fn bind_inputs(
    config: &mut ToolConfiguration,
    inputs: &BTreeMap<String, Vec<String>>,
) -> Result<(), PortBindingError> {
    for (name, files) in inputs {
        require_port(config, name, PortDirection::Input)?;
        config.bind_port(name, files.as_slice())?;
    }
    Ok(())
}

/// Switch off optional outputs the caller does not want.
pub fn disable_outputs(
    config: &mut ToolConfiguration,
    disabled: &[String],
) -> Result<(), PortBindingError> {
    for name in disabled {
        require_port(config, name, PortDirection::Output)?;
        config.set_port_active(name, false)?;
    }
    Ok(())
}

/// Bind explicit output files and plan the remaining active outputs.
///
/// Returns the files of every active output port.
pub fn bind_outputs(
    config: &mut ToolConfiguration,
    explicit: &BTreeMap<String, Vec<String>>,
    output_dir: &Path,
) -> Result<BTreeMap<String, Vec<String>>, PortBindingError> {
    for name in explicit.keys() {
        require_port(config, name, PortDirection::Output)?;
    }

    let list_count = list_output_count(config);
    let mut bound = BTreeMap::new();
    let ports: Vec<Port> = config
        .output_ports()
        .filter(|port| port.active)
        .cloned()
        .collect();

    for port in ports {
        let files = match explicit.get(&port.name) {
            Some(files) => files.clone(),
            None => planned_files(&port, list_count, output_dir),
        };
        config.bind_port(&port.name, files.as_slice())?;
        bound.insert(port.name.clone(), files);
    }
    Ok(bound)
}

/// File count for list outputs: the shortest bound list-typed input.
pub fn list_output_count(config: &ToolConfiguration) -> usize {
    config
        .input_ports()
        .filter(|port| port.is_list)
        .map(|port| config.port_files(&port.name).len())
        .filter(|count| *count > 0)
        .min()
        .unwrap_or(1)
}

fn planned_files(port: &Port, list_count: usize, output_dir: &Path) -> Vec<String> {
    let suffix = port
        .primary_extension()
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    let name = |stem: String| {
        output_dir
            .join(format!("{}{}", stem, suffix))
            .to_string_lossy()
            .into_owned()
    };

    if port.is_list {
        (0..list_count)
            .map(|i| name(format!("{}_{}", port.name, i)))
            .collect()
    } else {
        vec![name(port.name.clone())]
    }
}

fn require_port(
    config: &ToolConfiguration,
    name: &str,
    direction: PortDirection,
) -> Result<(), PortBindingError> {
    match config.port(name) {
        Some(port) if port.direction == direction => Ok(()),
        _ => Err(PortBindingError::UnknownPort {
            name: name.to_string(),
            direction,
        }),
    }
}
