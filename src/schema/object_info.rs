use super::{InputCapability, Schema, SchemaInput};
use crate::error::SchemaError;
use ahash::AHashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The `object_info` document served by the execution engine: one entry per node type.
#[derive(Debug, Clone, Default)]
pub struct ObjectInfo {
    schemas: AHashMap<String, Schema>,
}

#[derive(Deserialize)]
struct ObjectInfoEntry {
    #[serde(default)]
    input: InputSections,
    #[serde(default)]
    input_order: Option<InputOrder>,
}

#[derive(Deserialize, Default)]
struct InputSections {
    #[serde(default)]
    required: Map<String, Value>,
    #[serde(default)]
    optional: Map<String, Value>,
    #[serde(default)]
    hidden: Map<String, Value>,
}

#[derive(Deserialize)]
struct InputOrder {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    optional: Vec<String>,
}

impl ObjectInfo {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::Provider(format!("Could not read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Object(entries) = value else {
            return Err(SchemaError::JsonParseError(
                "object info must be a JSON object keyed by node type".to_string(),
            ));
        };
        let mut schemas = AHashMap::with_capacity(entries.len());
        for (type_name, entry) in entries {
            let schema = parse_entry(&type_name, entry)?;
            schemas.insert(type_name, schema);
        }
        Ok(Self { schemas })
    }

    pub fn get(&self, type_name: &str) -> Option<&Schema> {
        self.schemas.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn into_schemas(self) -> AHashMap<String, Schema> {
        self.schemas
    }
}

/// Parses a single node type entry of an `object_info` document.
pub fn parse_entry(type_name: &str, entry: Value) -> Result<Schema, SchemaError> {
    let entry: ObjectInfoEntry =
        serde_json::from_value(entry).map_err(|e| SchemaError::InvalidSchema {
            type_name: type_name.to_string(),
            message: e.to_string(),
        })?;
    let sections = entry.input;

    // An explicit `input_order` wins over the key order of the sections.
    let (required, optional): (Vec<String>, Vec<String>) = match entry.input_order {
        Some(order) => (order.required, order.optional),
        None => (
            sections.required.keys().cloned().collect(),
            sections.optional.keys().cloned().collect(),
        ),
    };

    let describe = |name: String, optional: bool| {
        let spec = sections
            .required
            .get(&name)
            .or_else(|| sections.optional.get(&name))
            .unwrap_or(&Value::Null);
        SchemaInput {
            capability: InputCapability::classify(spec),
            name,
            optional,
        }
    };

    let inputs = required
        .into_iter()
        .map(|name| describe(name, false))
        .chain(optional.into_iter().map(|name| describe(name, true)))
        .filter(|input| !sections.hidden.contains_key(&input.name))
        .collect();

    Ok(Schema {
        type_name: type_name.to_string(),
        inputs,
        hidden: sections.hidden.keys().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sections_in_declared_order() {
        let info = ObjectInfo::from_value(json!({
            "KSampler": {
                "input": {
                    "required": {
                        "model": ["MODEL"],
                        "seed": ["INT", {"default": 0}],
                        "sampler_name": [["euler", "ddim"]]
                    },
                    "optional": { "denoise": ["FLOAT"] },
                    "hidden": { "prompt": "PROMPT" }
                }
            }
        }))
        .unwrap();

        let schema = info.get("KSampler").unwrap();
        let order: Vec<_> = schema.input_order().collect();
        assert_eq!(order, vec!["model", "seed", "sampler_name", "denoise"]);
        assert_eq!(schema.capability("model"), Some(InputCapability::Link));
        assert_eq!(schema.capability("seed"), Some(InputCapability::Widget));
        assert!(schema.inputs()[3].optional);
        assert_eq!(schema.hidden(), &["prompt".to_string()]);
    }

    #[test]
    fn explicit_input_order_overrides_key_order() {
        let info = ObjectInfo::from_value(json!({
            "Mix": {
                "input": { "required": { "b": ["INT"], "a": ["IMAGE"] } },
                "input_order": { "required": ["a", "b"] }
            }
        }))
        .unwrap();
        let order: Vec<_> = info.get("Mix").unwrap().input_order().collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(ObjectInfo::from_value(json!([1, 2, 3])).is_err());
    }
}
