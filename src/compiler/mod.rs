use crate::error::{CompileError, Diagnostic};
use crate::schema::SchemaCache;
use crate::workflow::{LinkTable, RawWorkflow, Workflow};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

mod bypass;
pub mod prompt;
mod reconciler;
pub mod rules;

use bypass::BypassResolver;
use reconciler::NodeReconciler;
pub use rules::ReconcileRules;

/// Compiles editor workflows into prompts against a shared schema cache.
///
/// A compiler can be reused for any number of documents. The schema cache is
/// populated by the first compilation and shared by all later ones.
pub struct Compiler {
    cache: Arc<SchemaCache>,
    rules: ReconcileRules,
}

pub struct CompilerBuilder {
    cache: Arc<SchemaCache>,
    rules: ReconcileRules,
}

impl CompilerBuilder {
    pub fn new(cache: Arc<SchemaCache>) -> Self {
        Self {
            cache,
            rules: ReconcileRules::default(),
        }
    }
    pub fn with_rules(mut self, rules: ReconcileRules) -> Self {
        self.rules = rules;
        self
    }
    pub fn with_skip_input(mut self, name: &str) -> Self {
        self.rules = self.rules.with_skip_input(name);
        self
    }
    pub fn with_companion(mut self, input: &str, companion: &str) -> Self {
        self.rules = self.rules.with_companion(input, companion);
        self
    }
    pub fn with_exemption(mut self, node_type: &str, input: &str) -> Self {
        self.rules = self.rules.with_exemption(node_type, input);
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            cache: self.cache,
            rules: self.rules,
        }
    }
}

impl Compiler {
    pub fn builder(cache: Arc<SchemaCache>) -> CompilerBuilder {
        CompilerBuilder::new(cache)
    }

    pub fn new(cache: Arc<SchemaCache>) -> Self {
        CompilerBuilder::new(cache).build()
    }

    pub fn rules(&self) -> &ReconcileRules {
        &self.rules
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Parses and compiles a workflow document given as a JSON string.
    pub async fn compile_json(&self, json: &str) -> Result<Workflow, CompileError> {
        let raw = RawWorkflow::from_json(json)?;
        self.compile(&raw).await
    }

    /// Loads and compiles a workflow document from disk.
    pub async fn compile_file(&self, path: impl AsRef<Path>) -> Result<Workflow, CompileError> {
        let raw = RawWorkflow::from_file(path)?;
        self.compile(&raw).await
    }

    /// The main compilation function: link table, node reconciliation, then bypass.
    pub async fn compile(&self, raw: &RawWorkflow) -> Result<Workflow, CompileError> {
        if let Some(id) = raw.nodes.iter().map(|n| n.id).duplicates().next() {
            return Err(CompileError::DuplicateNode(id));
        }

        let mut diagnostics = Vec::new();
        let mut links = LinkTable::from_raw(&raw.links)?;
        tracing::info!(
            "Compiling workflow with {} nodes and {} links",
            raw.nodes.len(),
            links.len()
        );

        let mut nodes = BTreeMap::new();
        let mut reconciler = NodeReconciler::new(&links, &self.rules, &mut diagnostics);
        for raw_node in &raw.nodes {
            let schema = self.cache.lookup(&raw_node.node_type).await;
            let node = reconciler.reconcile(raw_node, schema)?;
            tracing::info!("Node {} disabled {}", node.id, node.is_disabled());
            nodes.insert(node.id, node);
        }

        BypassResolver::new(&nodes, &mut diagnostics).resolve(&mut links)?;

        Ok(Workflow::new(nodes, links, diagnostics))
    }
}

/// Logs a non-fatal diagnostic and keeps it for the compiled workflow.
pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    match &diagnostic {
        Diagnostic::BypassDeadEnd { .. } | Diagnostic::BypassCycle { .. } => {
            tracing::error!("{}", diagnostic)
        }
        _ => tracing::warn!("{}", diagnostic),
    }
    diagnostics.push(diagnostic);
}
