//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the promptgraph
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.

// Compilation
pub use crate::compiler::prompt::{Prompt, PromptInput, PromptNode};
pub use crate::compiler::{Compiler, CompilerBuilder, ReconcileRules};

// Schemas
pub use crate::schema::{
    InputCapability, ObjectInfo, Schema, SchemaCache, SchemaProvider, StaticSchemaProvider,
};

// Workflow model
pub use crate::workflow::{
    InputKind, InputValue, Link, LinkId, LinkTable, Node, NodeId, NodeInput, RawWorkflow,
    Workflow,
};

// Error types
pub use crate::error::{CompileError, Diagnostic, SchemaError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
