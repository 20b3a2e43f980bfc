//! Typed descriptor tree.
//!
//! The serialized descriptor (JSON or TOML) deserializes into these
//! structs in one pass; the parser then walks the tree structurally.
//! Unknown fields are rejected so that typos surface as schema errors
//! instead of silently ignored settings.
//!
//! ```toml
//! [tool]
//! name = "FileFilter"
//! version = "2.1.0"
//!
//! [parameters]
//! name = "FileFilter"
//!
//! [[parameters.entries]]
//! kind = "node"
//! name = "1"
//!
//! [[parameters.entries.entries]]
//! kind = "item"
//! name = "in"
//! type = "string"
//! tags = "input file,required"
//! supported_formats = "mzML"
//!
//! [[cli]]
//! option = "-in"
//! mappings = [{ reference = "1.in" }]
//! ```
//!
//! The same layout serves the parameter file written by the parameter-file
//! strategy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of a tool descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorDocument {
    pub tool: ToolSection,
    pub parameters: NodeEntry,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cli: Vec<CliElementEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relocators: Vec<RelocatorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ToolSection {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
}

/// A group of parameters. The root node has no `kind` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ParameterEntry>,
}

/// One child of a node, discriminated by its `kind` key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterEntry {
    Node(NodeEntry),
    Item(ItemEntry),
    #[serde(rename = "itemlist")]
    ItemList(ItemListEntry),
}

/// Scalar leaf.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ItemEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LiteralValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub restrictions: String,
    /// Comma-separated tag tokens
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    /// Comma-separated file extensions (file leaves only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<String>,
}

/// List leaf; `items` keep document order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ItemListEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<LiteralValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub restrictions: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<String>,
}

/// A literal as written in the descriptor.
///
/// Descriptor authors may write `value = 5` or `value = "5"`; both are
/// handed to the parameter's own parser as text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Bool(v) => write!(f, "{}", v),
            LiteralValue::Int(v) => write!(f, "{}", v),
            LiteralValue::Float(v) => write!(f, "{}", v),
            LiteralValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for LiteralValue {
    fn from(text: String) -> Self {
        LiteralValue::Text(text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliElementEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<MappingEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MappingEntry {
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelocatorEntry {
    pub reference: String,
    pub pattern: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_entries_deserialize() {
        let json = r#"{
            "tool": { "name": "Demo" },
            "parameters": {
                "name": "Demo",
                "entries": [
                    { "kind": "node", "name": "1", "entries": [
                        { "kind": "item", "name": "k", "type": "int", "value": 3 },
                        { "kind": "itemlist", "name": "w", "type": "double", "items": ["1.5", 2] }
                    ]}
                ]
            }
        }"#;
        let doc: DescriptorDocument = serde_json::from_str(json).unwrap();
        let ParameterEntry::Node(node) = &doc.parameters.entries[0] else {
            panic!("expected node");
        };
        assert_eq!(node.entries.len(), 2);
        let ParameterEntry::Item(item) = &node.entries[0] else {
            panic!("expected item");
        };
        assert_eq!(item.value, Some(LiteralValue::Int(3)));
        let ParameterEntry::ItemList(list) = &node.entries[1] else {
            panic!("expected itemlist");
        };
        assert_eq!(list.items[0].to_string(), "1.5");
        assert_eq!(list.items[1].to_string(), "2");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "tool": { "name": "Demo", "colour": "red" }, "parameters": { "name": "Demo" } }"#;
        assert!(serde_json::from_str::<DescriptorDocument>(json).is_err());
    }
}
