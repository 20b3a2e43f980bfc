//! Descriptor parsing.
//!
//! [`parse`] deserializes a JSON descriptor and [`parse_document`] turns an
//! already-deserialized [`DescriptorDocument`] into a [`ToolConfiguration`].
//! The parameter tree is walked once, structurally; all walk state lives in
//! a [`TreeWalker`] local to the call.
//!
//! Classification rules:
//!
//! | Leaf | Result |
//! |------|--------|
//! | name on the blacklist | skipped |
//! | tags contain `input file` / `output file` | file parameter + [`Port`] |
//! | `double` / `float` | `Double` with bounds from `restrictions` |
//! | `int` | `Int` with bounds from `restrictions` |
//! | `string`, restrictions exactly `true,false` | `Bool` |
//! | `string`, other restrictions | `StringChoice` |
//! | `string`, no restrictions | `String` |

use super::document::{
    CliElementEntry, DescriptorDocument, ItemEntry, ItemListEntry, LiteralValue, NodeEntry,
    ParameterEntry,
};
use crate::core::error::DomainError;
use crate::parameter::{Bounds, Parameter, ParameterKind, PortDirection, Value};
use crate::tool::{CliElement, Port, Relocator, ToolConfiguration, ToolInfo};

/// Internal switches the wrapped tools expose but that are never surfaced
/// as parameters or ports.
pub const BLACKLIST: &[&str] = &[
    "write_ini",
    "write_par",
    "par",
    "help",
    "ini",
    "write_ctd",
    "no_progress",
];

const TAG_MANDATORY: &str = "mandatory";
const TAG_REQUIRED: &str = "required";
const TAG_ADVANCED: &str = "advanced";

/// Parse a JSON descriptor.
pub fn parse(bytes: &[u8]) -> Result<ToolConfiguration, DomainError> {
    let document: DescriptorDocument =
        serde_json::from_slice(bytes).map_err(|e| DomainError::schema(e.to_string()))?;
    parse_document(document)
}

/// Build a [`ToolConfiguration`] from a deserialized descriptor.
///
/// Runs mapping compilation as the last step; any failure aborts loading
/// and no partial configuration is returned.
pub fn parse_document(document: DescriptorDocument) -> Result<ToolConfiguration, DomainError> {
    let DescriptorDocument {
        tool,
        parameters,
        cli,
        relocators,
    } = document;

    let name = tool.name.trim();
    if name.is_empty() {
        return Err(DomainError::MissingField("tool.name".to_string()));
    }

    let mut info = ToolInfo::new(name);
    info.version = tool.version;
    info.category = tool.category;
    info.description = tool.description;
    info.manual = tool.manual;
    info.docurl = tool.docurl.filter(|url| !url.trim().is_empty());
    if let Some(executable) = tool.executable.filter(|e| !e.trim().is_empty()) {
        info.executable = executable;
    }

    let mut walker = TreeWalker::default();
    walker.walk(&parameters, "")?;

    let mut builder = ToolConfiguration::builder(info).root_name(parameters.name);
    for (path, description) in walker.groups {
        builder = builder.group(path, description);
    }
    for parameter in walker.parameters {
        builder = builder.parameter(parameter);
    }
    for port in walker.ports {
        builder = builder.port(port);
    }
    for entry in cli {
        builder = builder.cli_element(cli_element(entry));
    }
    for entry in relocators {
        builder = builder.relocator(Relocator::new(entry.reference, entry.pattern));
    }

    builder.build()
}

fn cli_element(entry: CliElementEntry) -> CliElement {
    let mut element = CliElement::new();
    element.option = entry.option;
    element.is_list = entry.is_list;
    element.required = entry.required;
    for mapping in entry.mappings {
        element = element.with_mapping(mapping.reference);
    }
    element
}

/// Uniform view over scalar and list leaves.
struct Leaf<'a> {
    name: &'a str,
    value_type: &'a str,
    description: &'a str,
    restrictions: &'a str,
    tags: &'a str,
    supported_formats: Option<&'a str>,
    is_list: bool,
    values: Vec<&'a LiteralValue>,
}

impl<'a> From<&'a ItemEntry> for Leaf<'a> {
    fn from(item: &'a ItemEntry) -> Self {
        Self {
            name: &item.name,
            value_type: &item.value_type,
            description: &item.description,
            restrictions: &item.restrictions,
            tags: &item.tags,
            supported_formats: item.supported_formats.as_deref(),
            is_list: false,
            values: item.value.iter().collect(),
        }
    }
}

impl<'a> From<&'a ItemListEntry> for Leaf<'a> {
    fn from(list: &'a ItemListEntry) -> Self {
        Self {
            name: &list.name,
            value_type: &list.value_type,
            description: &list.description,
            restrictions: &list.restrictions,
            tags: &list.tags,
            supported_formats: list.supported_formats.as_deref(),
            is_list: true,
            values: list.items.iter().collect(),
        }
    }
}

#[derive(Default)]
struct TreeWalker {
    groups: Vec<(String, String)>,
    parameters: Vec<Parameter>,
    ports: Vec<Port>,
}

impl TreeWalker {
    fn walk(&mut self, node: &NodeEntry, prefix: &str) -> Result<(), DomainError> {
        for entry in &node.entries {
            match entry {
                ParameterEntry::Node(child) => {
                    if is_blacklisted(&child.name) {
                        continue;
                    }
                    let path = join_path(prefix, &child.name);
                    self.groups.push((path.clone(), child.description.clone()));
                    self.walk(child, &path)?;
                }
                ParameterEntry::Item(item) => self.leaf(Leaf::from(item), prefix)?,
                ParameterEntry::ItemList(list) => self.leaf(Leaf::from(list), prefix)?,
            }
        }
        Ok(())
    }

    fn leaf(&mut self, leaf: Leaf<'_>, prefix: &str) -> Result<(), DomainError> {
        if is_blacklisted(leaf.name) {
            return Ok(());
        }
        let path = join_path(prefix, leaf.name);
        let tags: Vec<&str> = split_tokens(leaf.tags).collect();

        let direction = if tags.contains(&PortDirection::Input.tag()) {
            Some(PortDirection::Input)
        } else if tags.contains(&PortDirection::Output.tag()) {
            Some(PortDirection::Output)
        } else {
            None
        };

        let kind = match direction {
            Some(direction) => {
                check_type_token(leaf.value_type, &path)?;
                ParameterKind::File { direction }
            }
            None => infer_kind(leaf.value_type, leaf.restrictions, &path)?,
        };

        let optional = !tags.iter().any(|t| *t == TAG_MANDATORY || *t == TAG_REQUIRED);
        let advanced = tags.contains(&TAG_ADVANCED);

        let mut parameter = Parameter::new(&path, kind).with_description(leaf.description);
        if leaf.is_list {
            parameter = parameter.as_list();
        }
        if !optional {
            parameter = parameter.required();
        }
        if advanced {
            parameter = parameter.advanced();
        }
        if let Some(default) = default_value(&parameter, &leaf, &path)? {
            parameter = parameter
                .with_default(default)
                .map_err(|e| DomainError::schema(format!("default of '{}': {}", path, e)))?;
        }

        if let Some(direction) = direction {
            let mut port = Port::new(&path, direction)
                .with_extensions(file_extensions(&leaf, &path)?);
            port.description = leaf.description.to_string();
            port.is_list = leaf.is_list;
            port.optional = optional;
            self.ports.push(port);
        }
        self.parameters.push(parameter);
        Ok(())
    }
}

/// Descriptor default, parsed against the inferred kind.
fn default_value(
    parameter: &Parameter,
    leaf: &Leaf<'_>,
    path: &str,
) -> Result<Option<Value>, DomainError> {
    let parse = |literal: &LiteralValue| {
        parameter
            .kind
            .parse_scalar(&literal.to_string())
            .map_err(|reason| DomainError::schema(format!("default of '{}': {}", path, reason)))
    };

    if leaf.is_list {
        if leaf.values.is_empty() {
            return Ok(None);
        }
        let items = leaf
            .values
            .iter()
            .copied()
            .map(parse)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Some(Value::List(items)));
    }

    match leaf.values.first() {
        Some(literal) if !literal.to_string().trim().is_empty() => {
            Ok(Some(Value::Scalar(parse(*literal)?)))
        }
        _ => Ok(None),
    }
}

fn infer_kind(token: &str, restrictions: &str, path: &str) -> Result<ParameterKind, DomainError> {
    let bounds_error =
        |reason: String| DomainError::schema(format!("restrictions of '{}': {}", path, reason));
    match token.trim() {
        "double" | "float" => Ok(ParameterKind::Double {
            bounds: Bounds::parse(restrictions).map_err(bounds_error)?,
        }),
        "int" => Ok(ParameterKind::Int {
            bounds: Bounds::parse(restrictions).map_err(bounds_error)?,
        }),
        "string" => Ok(string_kind(restrictions)),
        other => Err(unknown_type(other, path)),
    }
}

/// Bool only when the raw tokens are exactly `true` and `false`.
fn string_kind(restrictions: &str) -> ParameterKind {
    let raw: Vec<&str> = restrictions.split(',').collect();
    if raw.len() == 2 && raw.contains(&"true") && raw.contains(&"false") {
        return ParameterKind::Bool;
    }
    let choices: Vec<String> = split_tokens(restrictions).map(str::to_string).collect();
    if choices.is_empty() {
        ParameterKind::String
    } else {
        ParameterKind::StringChoice { choices }
    }
}

fn check_type_token(token: &str, path: &str) -> Result<(), DomainError> {
    match token.trim() {
        "double" | "float" | "int" | "string" => Ok(()),
        other => Err(unknown_type(other, path)),
    }
}

fn unknown_type(token: &str, path: &str) -> DomainError {
    DomainError::schema(format!("parameter '{}' has unknown type '{}'", path, token))
}

/// Extensions from `supported_formats`, falling back to `*.ext` restrictions.
fn file_extensions(leaf: &Leaf<'_>, path: &str) -> Result<Vec<String>, DomainError> {
    if let Some(formats) = leaf.supported_formats.filter(|f| !f.trim().is_empty()) {
        return Ok(split_tokens(formats).map(str::to_string).collect());
    }
    let extensions: Vec<String> = split_tokens(leaf.restrictions)
        .map(|token| token.strip_prefix("*.").unwrap_or(token).to_string())
        .collect();
    if extensions.is_empty() {
        return Err(DomainError::schema(format!(
            "file parameter '{}' declares neither supported_formats nor restrictions",
            path
        )));
    }
    Ok(extensions)
}

fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn is_blacklisted(name: &str) -> bool {
    BLACKLIST.contains(&name)
}
