use super::report;
use crate::error::{CompileError, Diagnostic};
use crate::workflow::{LinkTable, Node, NodeId};
use ahash::AHashSet;
use std::collections::BTreeMap;

/// Rewrites every link's effective source past chains of disabled nodes.
///
/// A disabled node passes output slot `n` through from whatever feeds its input
/// slot `n`, so the walk follows that link upstream until it reaches an enabled node.
pub(super) struct BypassResolver<'a> {
    nodes: &'a BTreeMap<NodeId, Node>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> BypassResolver<'a> {
    pub(super) fn new(
        nodes: &'a BTreeMap<NodeId, Node>,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self { nodes, diagnostics }
    }

    pub(super) fn resolve(&mut self, links: &mut LinkTable) -> Result<(), CompileError> {
        for link_id in links.ids() {
            let Some((mut node_id, mut slot)) = links.get(link_id).map(|l| l.effective_source())
            else {
                continue;
            };
            // Nodes already walked through for this link; a repeat means a cycle.
            let mut visited = AHashSet::new();

            loop {
                let source = self
                    .nodes
                    .get(&node_id)
                    .ok_or_else(|| CompileError::NodeNotFound { node_id, link_id })?;
                if !source.is_disabled() {
                    break;
                }
                if !visited.insert(node_id) {
                    report(self.diagnostics, Diagnostic::BypassCycle { link_id, node_id });
                    break;
                }
                match links.find_by_dest(node_id, slot) {
                    Some(upstream) => {
                        node_id = upstream.source_node;
                        slot = upstream.source_slot;
                    }
                    None => {
                        report(
                            self.diagnostics,
                            Diagnostic::BypassDeadEnd {
                                link_id,
                                node_id,
                                slot,
                            },
                        );
                        break;
                    }
                }
            }

            if let Some(link) = links.get_mut(link_id) {
                link.set_effective_source(node_id, slot);
                if link.is_rerouted() {
                    tracing::info!(
                        "Link {} changed source {}:{} to {}:{}",
                        link.id,
                        link.source_node,
                        link.source_slot,
                        node_id,
                        slot
                    );
                }
            }
        }
        Ok(())
    }
}
