//! The editor workflow: raw document model, link table and reconciled nodes.

pub mod definition;
pub mod link;
pub mod node;

pub use definition::*;
pub use link::*;
pub use node::*;

use crate::compiler::prompt::{Prompt, PromptCompiler};
use crate::error::Diagnostic;
use std::collections::BTreeMap;

pub type NodeId = i64;
pub type LinkId = i64;

/// A compiled workflow: reconciled nodes plus a bypass-resolved link table.
#[derive(Debug, Clone)]
pub struct Workflow {
    nodes: BTreeMap<NodeId, Node>,
    links: LinkTable,
    diagnostics: Vec<Diagnostic>,
}

impl Workflow {
    pub(crate) fn new(
        nodes: BTreeMap<NodeId, Node>,
        links: LinkTable,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            nodes,
            links,
            diagnostics,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    /// Non-fatal problems met while compiling, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn find_link_by_dst(&self, node: NodeId, slot: u32) -> Option<&Link> {
        self.links.find_by_dest(node, slot)
    }

    pub fn find_link_by_src(&self, node: NodeId, slot: u32) -> Option<&Link> {
        self.links.find_by_source(node, slot)
    }

    /// Emits the flat, execution-ready prompt graph.
    pub fn to_prompt(&self) -> Prompt {
        PromptCompiler::new(&self.nodes, &self.links).emit()
    }
}
