use super::{LinkId, NodeId};
use crate::error::CompileError;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A workflow document exactly as the editor saves it, before any compilation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWorkflow {
    #[serde(default)]
    pub links: Vec<RawLink>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

impl RawWorkflow {
    /// Parses a workflow document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json).map_err(|e| CompileError::JsonParseError(e.to_string()))
    }

    /// Parses a workflow document from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, CompileError> {
        serde_json::from_value(value).map_err(|e| CompileError::JsonParseError(e.to_string()))
    }

    /// Loads and parses a workflow document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CompileError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }
}

/// One link of the editor graph.
///
/// Accepts both the positional `[id, src, src_slot, dst, dst_slot, type]` form and the
/// object form (`origin_id`, `target_id`, ...) written by newer editor versions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "LinkRepr")]
pub struct RawLink {
    pub id: LinkId,
    pub source_node: NodeId,
    pub source_slot: u32,
    pub dest_node: NodeId,
    pub dest_slot: u32,
    pub datatype: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Tuple(LinkId, NodeId, u32, NodeId, u32, Value),
    Object {
        id: LinkId,
        origin_id: NodeId,
        origin_slot: u32,
        target_id: NodeId,
        target_slot: u32,
        #[serde(rename = "type", default)]
        datatype: Value,
    },
}

fn datatype_name(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<LinkRepr> for RawLink {
    fn from(repr: LinkRepr) -> Self {
        match repr {
            LinkRepr::Tuple(id, source_node, source_slot, dest_node, dest_slot, datatype) => {
                RawLink {
                    id,
                    source_node,
                    source_slot,
                    dest_node,
                    dest_slot,
                    datatype: datatype_name(datatype),
                }
            }
            LinkRepr::Object {
                id,
                origin_id,
                origin_slot,
                target_id,
                target_slot,
                datatype,
            } => RawLink {
                id,
                source_node: origin_id,
                source_slot: origin_slot,
                dest_node: target_id,
                dest_slot: target_slot,
                datatype: datatype_name(datatype),
            },
        }
    }
}

/// One node of the editor graph.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub mode: u32,
    #[serde(default)]
    pub inputs: Vec<RawInput>,
    #[serde(default)]
    pub outputs: Vec<RawOutput>,
    #[serde(default)]
    pub widgets_values: Option<Value>,
}

impl RawNode {
    /// The positional widget values of the node.
    ///
    /// Some custom nodes save their widgets as an object; its values are taken in
    /// declaration order. Anything else counts as no widget values.
    pub fn widget_values(&self) -> Vec<Value> {
        match &self.widgets_values {
            Some(Value::Array(values)) => values.clone(),
            Some(Value::Object(map)) => map.values().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// An authored input slot. A slot with `widget` set is a widget that the user
/// converted into a connectable input.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInput {
    pub name: String,
    #[serde(default)]
    pub link: Option<LinkId>,
    #[serde(default)]
    pub widget: Option<RawWidgetRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWidgetRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub links: Option<Vec<LinkId>>,
}
