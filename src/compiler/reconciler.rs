use super::report;
use super::rules::ReconcileRules;
use crate::error::{CompileError, Diagnostic};
use crate::schema::{InputCapability, Schema};
use crate::workflow::{LinkId, LinkTable, Node, NodeId, NodeInput, RawInput, RawNode};
use serde_json::Value;
use std::sync::Arc;

/// Matches a node's authored input slots and positional widget values against its schema.
pub(super) struct NodeReconciler<'a> {
    links: &'a LinkTable,
    rules: &'a ReconcileRules,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> NodeReconciler<'a> {
    pub(super) fn new(
        links: &'a LinkTable,
        rules: &'a ReconcileRules,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            links,
            rules,
            diagnostics,
        }
    }

    /// Builds a node from its raw JSON and reconciles it once.
    ///
    /// A missing schema disables the node and skips reconciliation. Disabled nodes are
    /// not reconciled either, since they never reach the prompt.
    pub(super) fn reconcile(
        &mut self,
        raw: &RawNode,
        schema: Option<Arc<Schema>>,
    ) -> Result<Node, CompileError> {
        let mut node = Node::new(raw, schema.clone());
        node.set_output_links(self.resolve_output_links(raw)?);

        let Some(schema) = schema else {
            report(
                self.diagnostics,
                Diagnostic::SchemaUnavailable {
                    node_id: raw.id,
                    type_name: raw.node_type.clone(),
                },
            );
            return Ok(node);
        };
        if node.is_disabled() {
            tracing::debug!("Node {} is disabled (mode {})", raw.id, raw.mode);
            return Ok(node);
        }

        let rules = self.rules;
        let values = node.raw_widget_values.clone();
        let mut widget_index = 0;

        for (schema_index, declared) in schema.inputs().iter().enumerate() {
            let name = declared.name.as_str();
            let authored = raw
                .inputs
                .iter()
                .find(|slot| slot.name == name)
                .filter(|_| !rules.is_skipped(name));

            let consumed = match authored {
                Some(slot) => {
                    let link = self.resolve_link(raw.id, slot)?;
                    let fallback = match slot.widget {
                        Some(_) => self.take_widget(raw.id, name, &values, &mut widget_index),
                        None => None,
                    };
                    let consumed = fallback.is_some();
                    node.push_input(NodeInput::link(name, schema_index, link, fallback));
                    consumed
                }
                None if declared.capability == InputCapability::Link => {
                    report(
                        self.diagnostics,
                        Diagnostic::MissingLinkSlot {
                            node_id: raw.id,
                            input_name: name.to_string(),
                        },
                    );
                    false
                }
                None => match self.take_widget(raw.id, name, &values, &mut widget_index) {
                    Some((index, value)) => {
                        node.push_input(NodeInput::widget(name, schema_index, index, value));
                        true
                    }
                    None => false,
                },
            };

            if consumed {
                for companion in rules.companions_for(&raw.node_type, name) {
                    if let Some((index, value)) =
                        self.take_widget(raw.id, companion, &values, &mut widget_index)
                    {
                        node.push_input(NodeInput::hidden(companion.as_str(), index, value));
                    }
                }
            }
        }

        if widget_index != values.len() {
            report(
                self.diagnostics,
                Diagnostic::CardinalityMismatch {
                    node_id: raw.id,
                    consumed: widget_index,
                    available: values.len(),
                },
            );
        }
        node.finish(widget_index);
        Ok(node)
    }

    /// Consumes the widget value under the cursor, if one is left.
    fn take_widget(
        &mut self,
        node_id: NodeId,
        input_name: &str,
        values: &[Value],
        widget_index: &mut usize,
    ) -> Option<(usize, Value)> {
        match values.get(*widget_index) {
            Some(value) => {
                let taken = (*widget_index, value.clone());
                *widget_index += 1;
                Some(taken)
            }
            None => {
                report(
                    self.diagnostics,
                    Diagnostic::WidgetsExhausted {
                        node_id,
                        input_name: input_name.to_string(),
                    },
                );
                None
            }
        }
    }

    fn resolve_link(
        &self,
        node_id: NodeId,
        slot: &RawInput,
    ) -> Result<Option<LinkId>, CompileError> {
        match slot.link {
            None => Ok(None),
            Some(link_id) if self.links.contains(link_id) => Ok(Some(link_id)),
            Some(link_id) => Err(CompileError::LinkNotFound {
                link_id,
                node_id,
                slot_name: slot.name.clone(),
            }),
        }
    }

    fn resolve_output_links(&self, raw: &RawNode) -> Result<Vec<Vec<LinkId>>, CompileError> {
        raw.outputs
            .iter()
            .map(|output| {
                let ids = output.links.clone().unwrap_or_default();
                match ids.iter().find(|id| !self.links.contains(**id)) {
                    Some(&link_id) => Err(CompileError::LinkNotFound {
                        link_id,
                        node_id: raw.id,
                        slot_name: output.name.clone(),
                    }),
                    None => Ok(ids),
                }
            })
            .collect()
    }
}
