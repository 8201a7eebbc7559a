use super::definition::{RawInput, RawNode};
use super::{LinkId, NodeId};
use crate::schema::Schema;
use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Editor modes that take a node out of the execution graph (muted and bypassed).
pub const DISABLED_MODES: [u32; 2] = [2, 4];

/// How a reconciled input receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Fed by a link from another node's output.
    Link,
    /// A literal taken from the node's widget values.
    Widget,
    /// An editor-only value that follows a widget but is not declared by the schema.
    HiddenWidget,
}

/// The value carried by a reconciled input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// `link` is `None` when the slot exists but nothing is connected. `fallback`
    /// holds the widget value of a converted widget slot.
    Link {
        link: Option<LinkId>,
        fallback: Option<Value>,
    },
    Literal(Value),
}

/// One input slot of a node after reconciliation against its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInput {
    pub input_name: String,
    /// Position in the schema's input order; `None` for hidden widgets.
    pub schema_index: Option<usize>,
    pub kind: InputKind,
    pub value: InputValue,
    /// Index consumed from the node's widget values, if any.
    pub widget_array_index: Option<usize>,
}

impl NodeInput {
    pub fn link(
        name: impl Into<String>,
        schema_index: usize,
        link: Option<LinkId>,
        fallback: Option<(usize, Value)>,
    ) -> Self {
        let (widget_array_index, fallback) = match fallback {
            Some((index, value)) => (Some(index), Some(value)),
            None => (None, None),
        };
        Self {
            input_name: name.into(),
            schema_index: Some(schema_index),
            kind: InputKind::Link,
            value: InputValue::Link { link, fallback },
            widget_array_index,
        }
    }

    pub fn widget(
        name: impl Into<String>,
        schema_index: usize,
        widget_index: usize,
        value: Value,
    ) -> Self {
        Self {
            input_name: name.into(),
            schema_index: Some(schema_index),
            kind: InputKind::Widget,
            value: InputValue::Literal(value),
            widget_array_index: Some(widget_index),
        }
    }

    pub fn hidden(name: impl Into<String>, widget_index: usize, value: Value) -> Self {
        Self {
            input_name: name.into(),
            schema_index: None,
            kind: InputKind::HiddenWidget,
            value: InputValue::Literal(value),
            widget_array_index: Some(widget_index),
        }
    }

    pub fn link_id(&self) -> Option<LinkId> {
        match &self.value {
            InputValue::Link { link, .. } => *link,
            InputValue::Literal(_) => None,
        }
    }

    /// The literal of a widget input, or the fallback of a converted widget slot.
    pub fn literal(&self) -> Option<&Value> {
        match &self.value {
            InputValue::Literal(value) => Some(value),
            InputValue::Link { fallback, .. } => fallback.as_ref(),
        }
    }
}

/// One node of a workflow, reconciled against its schema.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub node_type: String,
    pub mode: u32,
    pub raw_inputs: Vec<RawInput>,
    pub raw_widget_values: Vec<Value>,
    disabled: bool,
    schema: Option<Arc<Schema>>,
    reconciled_inputs: Vec<NodeInput>,
    // Key: input name, Value: index into `reconciled_inputs`
    widgets_by_name: AHashMap<String, usize>,
    output_links: Vec<Vec<LinkId>>,
    widgets_consumed: usize,
    initialized: bool,
}

impl Node {
    /// Creates an unreconciled node. A node without a schema is always disabled.
    pub(crate) fn new(raw: &RawNode, schema: Option<Arc<Schema>>) -> Self {
        let disabled = schema.is_none() || DISABLED_MODES.contains(&raw.mode);
        Self {
            id: raw.id,
            node_type: raw.node_type.clone(),
            mode: raw.mode,
            raw_inputs: raw.inputs.clone(),
            raw_widget_values: raw.widget_values(),
            disabled,
            schema,
            reconciled_inputs: Vec::new(),
            widgets_by_name: AHashMap::new(),
            output_links: Vec::new(),
            widgets_consumed: 0,
            initialized: false,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    pub fn inputs(&self) -> &[NodeInput] {
        &self.reconciled_inputs
    }

    /// Looks up a reconciled widget by input name: visible, hidden, or a converted
    /// slot that consumed a widget value.
    pub fn widget(&self, name: &str) -> Option<&NodeInput> {
        self.widgets_by_name
            .get(name)
            .map(|&index| &self.reconciled_inputs[index])
    }

    pub fn input(&self, name: &str) -> Option<&NodeInput> {
        self.reconciled_inputs
            .iter()
            .find(|input| input.input_name == name)
    }

    /// Link ids leaving each output slot, in slot order.
    pub fn output_links(&self) -> &[Vec<LinkId>] {
        &self.output_links
    }

    /// Number of widget values consumed by reconciliation.
    pub fn widgets_consumed(&self) -> usize {
        self.widgets_consumed
    }

    /// The authored input slot with this name, if any.
    pub fn raw_input(&self, name: &str) -> Option<&RawInput> {
        self.raw_inputs.iter().find(|input| input.name == name)
    }

    pub(crate) fn push_input(&mut self, input: NodeInput) {
        if input.kind != InputKind::Link || input.widget_array_index.is_some() {
            self.widgets_by_name
                .insert(input.input_name.clone(), self.reconciled_inputs.len());
        }
        self.reconciled_inputs.push(input);
    }

    pub(crate) fn set_output_links(&mut self, output_links: Vec<Vec<LinkId>>) {
        self.output_links = output_links;
    }

    pub(crate) fn finish(&mut self, widgets_consumed: usize) {
        self.widgets_consumed = widgets_consumed;
        self.initialized = true;
    }
}
