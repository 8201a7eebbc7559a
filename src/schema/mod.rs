//! Per-node-type input schemas and the cache that serves them to the compiler.

pub mod cache;
pub mod object_info;
pub mod provider;

pub use cache::SchemaCache;
pub use object_info::ObjectInfo;
pub use provider::{SchemaProvider, StaticSchemaProvider};

use serde_json::Value;

/// Primitive types the editor renders as widgets rather than link sockets.
pub const WIDGET_TYPES: [&str; 6] = ["INT", "FLOAT", "STRING", "BOOLEAN", "BOOL", "COMBO"];

/// Whether a declared input can only be fed by a link, or can also hold a widget value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCapability {
    Link,
    Widget,
}

impl InputCapability {
    /// Classifies an object-info input spec, `[type, options?]`.
    pub fn classify(spec: &Value) -> Self {
        let (type_spec, options) = match spec {
            Value::Array(items) => (items.first(), items.get(1)),
            other => (Some(other), None),
        };
        let forced = options
            .and_then(|o| o.get("forceInput"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if forced {
            return InputCapability::Link;
        }
        match type_spec {
            Some(Value::Array(_)) => InputCapability::Widget,
            Some(Value::String(name)) if WIDGET_TYPES.contains(&name.as_str()) => {
                InputCapability::Widget
            }
            _ => InputCapability::Link,
        }
    }
}

/// One visible input declared by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInput {
    pub name: String,
    pub capability: InputCapability,
    pub optional: bool,
}

/// The declared inputs of one node type, in the order the editor lays out widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub type_name: String,
    inputs: Vec<SchemaInput>,
    hidden: Vec<String>,
}

impl Schema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            inputs: Vec::new(),
            hidden: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, name: impl Into<String>, capability: InputCapability) -> Self {
        self.inputs.push(SchemaInput {
            name: name.into(),
            capability,
            optional: false,
        });
        self
    }

    #[must_use]
    pub fn with_optional_input(
        mut self,
        name: impl Into<String>,
        capability: InputCapability,
    ) -> Self {
        self.inputs.push(SchemaInput {
            name: name.into(),
            capability,
            optional: true,
        });
        self
    }

    #[must_use]
    pub fn with_link_input(self, name: impl Into<String>) -> Self {
        self.with_input(name, InputCapability::Link)
    }

    #[must_use]
    pub fn with_widget_input(self, name: impl Into<String>) -> Self {
        self.with_input(name, InputCapability::Widget)
    }

    #[must_use]
    pub fn with_hidden(mut self, name: impl Into<String>) -> Self {
        self.hidden.push(name.into());
        self
    }

    pub fn inputs(&self) -> &[SchemaInput] {
        &self.inputs
    }

    /// Visible input names in declaration order. Hidden inputs are never included.
    pub fn input_order(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|input| input.name.as_str())
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|input| input.name == name)
    }

    pub fn capability(&self, name: &str) -> Option<InputCapability> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .map(|input| input.capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_widget_and_link_types() {
        assert_eq!(
            InputCapability::classify(&json!(["INT", {"default": 0}])),
            InputCapability::Widget
        );
        assert_eq!(
            InputCapability::classify(&json!([["euler", "ddim"]])),
            InputCapability::Widget
        );
        assert_eq!(
            InputCapability::classify(&json!(["MODEL"])),
            InputCapability::Link
        );
        assert_eq!(InputCapability::classify(&json!("*")), InputCapability::Link);
    }

    #[test]
    fn force_input_makes_a_widget_type_link_only() {
        let spec = json!(["STRING", {"forceInput": true}]);
        assert_eq!(InputCapability::classify(&spec), InputCapability::Link);
    }

    #[test]
    fn input_order_excludes_hidden() {
        let schema = Schema::new("KSampler")
            .with_link_input("model")
            .with_widget_input("seed")
            .with_hidden("prompt");
        let order: Vec<_> = schema.input_order().collect();
        assert_eq!(order, vec!["model", "seed"]);
        assert_eq!(schema.position("seed"), Some(1));
        assert_eq!(schema.position("prompt"), None);
    }
}
