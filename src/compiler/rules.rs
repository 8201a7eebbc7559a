use crate::error::CompileError;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the editor control saved right after seed-like widgets.
pub const CONTROL_AFTER_GENERATE: &str = "control_after_generate";

/// Exceptions the node reconciler applies while matching widget values to schema inputs.
///
/// These describe editor behaviour that no schema declares, so they are data rather than
/// logic. The defaults cover the stock editor; a JSON file or the builder methods can
/// replace or extend them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileRules {
    /// Authored input slots with these names are ignored and the input is matched as a
    /// plain widget instead.
    pub skip_inputs: AHashSet<String>,
    /// Input name -> extra positional values the editor saves right after it.
    pub companions: AHashMap<String, Vec<String>>,
    /// Node type -> input names whose companions that node type does not save.
    pub exemptions: AHashMap<String, AHashSet<String>>,
}

impl Default for ReconcileRules {
    fn default() -> Self {
        let companions = ["seed", "noise_seed"]
            .into_iter()
            .map(|name| (name.to_string(), vec![CONTROL_AFTER_GENERATE.to_string()]))
            .collect();
        Self {
            skip_inputs: AHashSet::new(),
            companions,
            exemptions: AHashMap::new(),
        }
    }
}

impl ReconcileRules {
    /// Rules with no exceptions at all.
    pub fn empty() -> Self {
        Self {
            skip_inputs: AHashSet::new(),
            companions: AHashMap::new(),
            exemptions: AHashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        serde_json::from_str(json).map_err(|e| CompileError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CompileError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    #[must_use]
    pub fn with_skip_input(mut self, name: impl Into<String>) -> Self {
        self.skip_inputs.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_companion(mut self, input: impl Into<String>, companion: impl Into<String>) -> Self {
        self.companions
            .entry(input.into())
            .or_default()
            .push(companion.into());
        self
    }

    #[must_use]
    pub fn with_exemption(mut self, node_type: impl Into<String>, input: impl Into<String>) -> Self {
        self.exemptions
            .entry(node_type.into())
            .or_default()
            .insert(input.into());
        self
    }

    pub fn is_skipped(&self, input_name: &str) -> bool {
        self.skip_inputs.contains(input_name)
    }

    /// Companion values that follow `input_name` on a node of `node_type`, in save order.
    pub fn companions_for(&self, node_type: &str, input_name: &str) -> &[String] {
        let exempt = self
            .exemptions
            .get(node_type)
            .is_some_and(|inputs| inputs.contains(input_name));
        if exempt {
            return &[];
        }
        self.companions
            .get(input_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
