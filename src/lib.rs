//! # promptgraph - Workflow to Prompt Compiler
//!
//! **promptgraph** compiles the node-graph workflows saved by a visual editor into the
//! flat "prompt" graph an execution engine consumes. Editor documents store widget
//! values positionally, keep muted and bypassed nodes in the graph, and wire nodes with
//! link records; the prompt needs named inputs and only the nodes that actually run.
//!
//! ## Core Workflow
//!
//! 1.  **Provide Schemas**: Wrap a [`schema::SchemaProvider`] (or an `object_info`
//!     document) in a [`schema::SchemaCache`]. The cache fetches every node type once
//!     and is shared by all compilations.
//! 2.  **Compile**: Use [`Compiler::builder`] to create a compiler, optionally overriding
//!     the [`compiler::ReconcileRules`]. Compiling a document builds the link table,
//!     reconciles every node against its schema and bypasses disabled nodes.
//! 3.  **Emit**: Call [`workflow::Workflow::to_prompt`] and serialize the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promptgraph::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let object_info = ObjectInfo::from_file("object_info.json")?;
//! let cache = Arc::new(SchemaCache::new(Arc::new(StaticSchemaProvider::from(object_info))));
//!
//! let compiler = Compiler::builder(cache)
//!     .with_companion("seed", "control_after_generate")
//!     .build();
//!
//! let workflow = compiler.compile_file("workflow.json").await?;
//! for diagnostic in workflow.diagnostics() {
//!     println!("warning: {}", diagnostic);
//! }
//! println!("{}", workflow.to_prompt().to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod workflow;

pub use compiler::Compiler;
