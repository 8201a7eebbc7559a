use crate::error::CompileError;
use crate::workflow::{InputKind, InputValue, LinkTable, Node, NodeId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single input of a prompt node: a literal, or `[source_node_id, source_slot]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PromptInput {
    Link(String, u32),
    Literal(Value),
}

/// One executable node of the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptNode {
    pub class_type: String,
    pub inputs: BTreeMap<String, PromptInput>,
}

/// The flat, execution-ready graph. Serializes as an object keyed by stringified node
/// id, in ascending numeric id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Prompt {
    nodes: BTreeMap<NodeId, PromptNode>,
}

impl Prompt {
    pub fn get(&self, id: NodeId) -> Option<&PromptNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &PromptNode)> {
        self.nodes.iter()
    }

    pub fn to_value(&self) -> Result<Value, CompileError> {
        serde_json::to_value(self).map_err(|e| CompileError::SerializeError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CompileError> {
        serde_json::to_string(self).map_err(|e| CompileError::SerializeError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, CompileError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CompileError::SerializeError(e.to_string()))
    }
}

/// Turns reconciled nodes and bypass-resolved links into a [`Prompt`].
pub struct PromptCompiler<'a> {
    nodes: &'a BTreeMap<NodeId, Node>,
    links: &'a LinkTable,
}

impl<'a> PromptCompiler<'a> {
    pub fn new(nodes: &'a BTreeMap<NodeId, Node>, links: &'a LinkTable) -> Self {
        Self { nodes, links }
    }

    pub fn emit(&self) -> Prompt {
        let nodes = self
            .nodes
            .values()
            .filter(|node| !node.is_disabled() && node.is_initialized())
            .map(|node| {
                let prompt_node = PromptNode {
                    class_type: node.node_type.clone(),
                    inputs: self.emit_inputs(node),
                };
                (node.id, prompt_node)
            })
            .collect();
        Prompt { nodes }
    }

    fn emit_inputs(&self, node: &Node) -> BTreeMap<String, PromptInput> {
        let mut inputs = BTreeMap::new();
        for input in node.inputs() {
            if input.kind == InputKind::HiddenWidget {
                continue;
            }
            let value = match &input.value {
                InputValue::Literal(value) => PromptInput::Literal(value.clone()),
                InputValue::Link { link, fallback } => {
                    // Always the bypass-resolved source, never the authored one.
                    match link.and_then(|id| self.links.get(id)) {
                        Some(link) => PromptInput::Link(
                            link.effective_source_node().to_string(),
                            link.effective_source_slot(),
                        ),
                        None => match fallback {
                            Some(value) => PromptInput::Literal(value.clone()),
                            None => continue,
                        },
                    }
                }
            };
            inputs.insert(input.input_name.clone(), value);
        }
        inputs
    }
}
