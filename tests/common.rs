//! Common test utilities for building schemas and workflow documents.
use promptgraph::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

/// Schemas for the node types used across the tests.
///
/// - `T1`: a single widget `value`
/// - `T2`: a single link-capable input `text`
/// - `Loader`: a single widget `ckpt_name`
/// - `KSampler`: `model` (link), `seed`, `steps`, `sampler_name` (widgets), `positive` (link)
/// - `TextBox`: a single widget `text`
#[allow(dead_code)]
pub fn test_schemas() -> Vec<Schema> {
    vec![
        Schema::new("T1").with_widget_input("value"),
        Schema::new("T2").with_link_input("text"),
        Schema::new("Loader").with_widget_input("ckpt_name"),
        Schema::new("KSampler")
            .with_link_input("model")
            .with_widget_input("seed")
            .with_widget_input("steps")
            .with_widget_input("sampler_name")
            .with_link_input("positive")
            .with_hidden("prompt"),
        Schema::new("TextBox").with_widget_input("text"),
    ]
}

#[allow(dead_code)]
pub fn test_cache() -> Arc<SchemaCache> {
    Arc::new(SchemaCache::preloaded(test_schemas()))
}

/// Compiles a workflow document with the default rules.
#[allow(dead_code)]
pub fn compile(document: Value) -> std::result::Result<Workflow, CompileError> {
    compile_with(Compiler::new(test_cache()), document)
}

#[allow(dead_code)]
pub fn compile_with(
    compiler: Compiler,
    document: Value,
) -> std::result::Result<Workflow, CompileError> {
    let raw = RawWorkflow::from_value(document)?;
    tokio_test::block_on(compiler.compile(&raw))
}

/// Node A (`T1`, "hello") feeds the `text` input of node B (`T2`) through link 1.
#[allow(dead_code)]
pub fn two_node_document(mode_a: u32) -> Value {
    json!({
        "nodes": [
            {
                "id": 1, "type": "T1", "mode": mode_a,
                "inputs": [{ "name": "text", "link": 2 }],
                "outputs": [{ "name": "TEXT", "links": [1] }],
                "widgets_values": ["hello"]
            },
            {
                "id": 2, "type": "T2", "mode": 0,
                "inputs": [{ "name": "text", "link": 1 }]
            },
            {
                "id": 3, "type": "T1", "mode": 0,
                "outputs": [{ "name": "TEXT", "links": [2] }],
                "widgets_values": ["upstream"]
            }
        ],
        "links": [
            [1, 1, 0, 2, 0, "STRING"],
            [2, 3, 0, 1, 0, "STRING"]
        ]
    })
}

/// A sampler (node 7) fed by a loader (node 5) and a text node (node 6).
///
/// `sampler_inputs` and `widgets` replace the sampler's authored inputs and widget values.
#[allow(dead_code)]
pub fn sampler_document(sampler_inputs: Value, widgets: Value) -> Value {
    json!({
        "nodes": [
            {
                "id": 5, "type": "Loader", "mode": 0,
                "outputs": [{ "name": "MODEL", "links": [10] }],
                "widgets_values": ["model.safetensors"]
            },
            {
                "id": 6, "type": "T1", "mode": 0,
                "outputs": [{ "name": "CONDITIONING", "links": [11, 12] }],
                "widgets_values": ["a photo of a cat"]
            },
            {
                "id": 7, "type": "KSampler", "mode": 0,
                "inputs": sampler_inputs,
                "widgets_values": widgets
            }
        ],
        "links": [
            [10, 5, 0, 7, 0, "MODEL"],
            [11, 6, 0, 7, 1, "CONDITIONING"],
            [12, 6, 0, 7, 2, "INT"]
        ]
    })
}

/// The sampler's usual authored inputs: `model` on link 10 and `positive` on link 11.
#[allow(dead_code)]
pub fn sampler_links() -> Value {
    json!([
        { "name": "model", "link": 10 },
        { "name": "positive", "link": 11 }
    ])
}
