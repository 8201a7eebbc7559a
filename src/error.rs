use crate::workflow::{LinkId, NodeId};
use thiserror::Error;

/// Errors that abort the compilation of a whole workflow document.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to serialize prompt: {0}")]
    SerializeError(String),

    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Link {link_id} referenced by node {node_id} (slot '{slot_name}') is not in the link table")]
    LinkNotFound {
        link_id: LinkId,
        node_id: NodeId,
        slot_name: String,
    },

    #[error("Node {node_id} not found, which is required by link {link_id}")]
    NodeNotFound { node_id: NodeId, link_id: LinkId },

    #[error("Node id {0} appears more than once in the workflow")]
    DuplicateNode(NodeId),

    #[error("Link id {0} appears more than once in the workflow")]
    DuplicateLink(LinkId),
}

/// Errors raised by a schema provider or while parsing schema documents.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Schema provider failed: {0}")]
    Provider(String),

    #[error("Invalid schema for node type '{type_name}': {message}")]
    InvalidSchema { type_name: String, message: String },

    #[error("Failed to parse object info JSON: {0}")]
    JsonParseError(String),
}

/// Non-fatal conditions found while compiling. Each one is logged when it is
/// recorded and kept on the compiled workflow for callers to inspect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("No schema available for node {node_id} of type '{type_name}', node disabled")]
    SchemaUnavailable { node_id: NodeId, type_name: String },

    #[error("Link {link_id}: no upstream link into disabled node {node_id} slot {slot}")]
    BypassDeadEnd {
        link_id: LinkId,
        node_id: NodeId,
        slot: u32,
    },

    #[error("Link {link_id}: bypass revisited node {node_id}, stopping")]
    BypassCycle { link_id: LinkId, node_id: NodeId },

    #[error("Node {node_id}: consumed {consumed} of {available} widget values")]
    CardinalityMismatch {
        node_id: NodeId,
        consumed: usize,
        available: usize,
    },

    #[error("Node {node_id}: no widget value left for input '{input_name}'")]
    WidgetsExhausted { node_id: NodeId, input_name: String },

    #[error("Node {node_id}: link-only input '{input_name}' has no authored slot, nothing consumed")]
    MissingLinkSlot { node_id: NodeId, input_name: String },
}
