//! Serializes the current parameter state back into a descriptor tree.
//!
//! Used by the parameter-file strategy: the tree mirrors the descriptor's
//! nesting, carries current values instead of defaults, and re-derives
//! restrictions from the parsed constraints. File parameters without a
//! value and optional outputs whose port is switched off are left out.

use super::document::{
    DescriptorDocument, ItemEntry, ItemListEntry, LiteralValue, NodeEntry, ParameterEntry,
    ToolSection,
};
use crate::parameter::{Parameter, PortDirection};
use crate::tool::ToolConfiguration;

pub fn to_document(config: &ToolConfiguration) -> DescriptorDocument {
    let info = config.info();
    let mut root = NodeEntry {
        name: config.root_name().to_string(),
        ..Default::default()
    };

    for parameter in config.parameters() {
        if is_omitted(config, parameter) {
            continue;
        }
        let segments: Vec<&str> = parameter.key.split('.').collect();
        let parents = &segments[..segments.len() - 1];
        let node = node_at(&mut root, parents, config);
        node.entries.push(leaf_entry(config, parameter));
    }

    // Groups whose parameters were all omitted still appear
    for path in config.groups().keys() {
        let segments: Vec<&str> = path.split('.').collect();
        node_at(&mut root, &segments, config);
    }

    DescriptorDocument {
        tool: ToolSection {
            name: info.name.clone(),
            version: info.version.clone(),
            ..Default::default()
        },
        parameters: root,
        cli: Vec::new(),
        relocators: Vec::new(),
    }
}

fn is_omitted(config: &ToolConfiguration, parameter: &Parameter) -> bool {
    match parameter.direction() {
        Some(PortDirection::Output) if config.is_inactive_output(&parameter.key) => true,
        Some(_) => !parameter.is_bound(),
        None => false,
    }
}

/// Walk (creating as needed) the group node at `segments`.
fn node_at<'a>(
    root: &'a mut NodeEntry,
    segments: &[&str],
    config: &ToolConfiguration,
) -> &'a mut NodeEntry {
    let mut node = root;
    let mut path = String::new();
    for segment in segments {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(segment);

        let position = node
            .entries
            .iter()
            .position(|e| matches!(e, ParameterEntry::Node(n) if n.name == *segment));
        let index = match position {
            Some(index) => index,
            None => {
                node.entries.push(ParameterEntry::Node(NodeEntry {
                    name: segment.to_string(),
                    description: config.groups().get(&path).cloned().unwrap_or_default(),
                    entries: Vec::new(),
                }));
                node.entries.len() - 1
            }
        };
        node = match &mut node.entries[index] {
            ParameterEntry::Node(child) => child,
            _ => unreachable!("position matched a node entry"),
        };
    }
    node
}

fn leaf_entry(config: &ToolConfiguration, parameter: &Parameter) -> ParameterEntry {
    let port = config.port(&parameter.key);
    let supported_formats = port.map(|p| p.extensions.join(","));
    let restrictions = parameter.kind.restriction();
    let tags = tags(parameter);
    let values: Vec<LiteralValue> = parameter
        .string_values()
        .unwrap_or_default()
        .into_iter()
        .map(LiteralValue::from)
        .collect();

    if parameter.is_list {
        ParameterEntry::ItemList(ItemListEntry {
            name: parameter.name.clone(),
            value_type: parameter.kind.type_token().to_string(),
            items: values,
            description: parameter.description.clone(),
            restrictions,
            tags,
            supported_formats,
        })
    } else {
        ParameterEntry::Item(ItemEntry {
            name: parameter.name.clone(),
            value_type: parameter.kind.type_token().to_string(),
            value: values.into_iter().next(),
            description: parameter.description.clone(),
            restrictions,
            tags,
            supported_formats,
        })
    }
}

fn tags(parameter: &Parameter) -> String {
    let mut tags = Vec::new();
    if let Some(direction) = parameter.direction() {
        tags.push(direction.tag());
    }
    if !parameter.optional {
        tags.push("required");
    }
    if parameter.advanced {
        tags.push("advanced");
    }
    tags.join(",")
}
