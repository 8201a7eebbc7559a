//! Integration tests for promptgraph
//!
//! End-to-end tests that go from workflow JSON to serialized prompt JSON.
//!
mod common;
use common::*;
use promptgraph::prelude::*;
use serde_json::json;
use std::sync::Arc;

const OBJECT_INFO_JSON: &str = r#"{
    "CheckpointLoader": {
        "input": { "required": { "ckpt_name": [["a.safetensors", "b.safetensors"]] } },
        "output": ["MODEL"]
    },
    "KSampler": {
        "input": {
            "required": {
                "model": ["MODEL"],
                "seed": ["INT", { "default": 0 }],
                "steps": ["INT", { "default": 20 }]
            },
            "hidden": { "prompt": "PROMPT" }
        }
    },
    "SaveImage": {
        "input": {
            "required": { "images": ["IMAGE"], "filename_prefix": ["STRING"] }
        }
    }
}"#;

const WORKFLOW_JSON: &str = r#"{
    "last_node_id": 10,
    "last_link_id": 3,
    "nodes": [
        {
            "id": 10, "type": "SaveImage", "mode": 0,
            "inputs": [{ "name": "images", "type": "IMAGE", "link": 3 }],
            "widgets_values": ["output"]
        },
        {
            "id": 2, "type": "KSampler", "mode": 0,
            "inputs": [{ "name": "model", "type": "MODEL", "link": 1 }],
            "outputs": [{ "name": "IMAGE", "type": "IMAGE", "links": [2] }],
            "widgets_values": [1234, "randomize", 25]
        },
        {
            "id": 1, "type": "CheckpointLoader", "mode": 0,
            "outputs": [{ "name": "MODEL", "type": "MODEL", "links": [1] }],
            "widgets_values": ["a.safetensors"]
        },
        {
            "id": 3, "type": "Upscale", "mode": 4,
            "inputs": [{ "name": "image", "type": "IMAGE", "link": 2 }],
            "outputs": [{ "name": "IMAGE", "type": "IMAGE", "links": [3] }]
        }
    ],
    "links": [
        [1, 1, 0, 2, 0, "MODEL"],
        [2, 2, 0, 3, 0, "IMAGE"],
        [3, 3, 0, 10, 0, "IMAGE"]
    ]
}"#;

fn object_info_compiler() -> Compiler {
    let info = ObjectInfo::from_json(OBJECT_INFO_JSON).expect("Failed to parse object info");
    let cache = SchemaCache::new(Arc::new(StaticSchemaProvider::from(info)));
    Compiler::new(Arc::new(cache))
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_two_node_scenario() {
        let prompt = compile(two_node_document(0)).unwrap().to_prompt();

        let b = prompt.get(2).expect("Node B should be compiled");
        assert_eq!(b.class_type, "T2");
        assert_eq!(b.inputs["text"], PromptInput::Link("1".to_string(), 0));

        // Every link input points at a node present in the prompt.
        for (_, node) in prompt.iter() {
            for input in node.inputs.values() {
                if let PromptInput::Link(source, _) = input {
                    let id: NodeId = source.parse().unwrap();
                    assert!(prompt.contains(id), "dangling reference to {}", source);
                }
            }
        }
    }

    #[test]
    fn test_two_node_scenario_with_disabled_source() {
        let workflow = compile(two_node_document(2)).unwrap();
        assert_eq!(workflow.link(1).unwrap().effective_source(), (3, 0));

        let prompt = workflow.to_prompt();
        assert!(!prompt.contains(1));
        assert_eq!(
            prompt.get(2).unwrap().inputs["text"],
            PromptInput::Link("3".to_string(), 0)
        );
    }

    #[test]
    fn test_end_to_end_from_object_info() {
        let compiler = object_info_compiler();
        let workflow = tokio_test::block_on(compiler.compile_json(WORKFLOW_JSON))
            .expect("Failed to compile workflow");
        let prompt = workflow.to_prompt().to_value().unwrap();

        assert_eq!(
            prompt,
            json!({
                "1": {
                    "class_type": "CheckpointLoader",
                    "inputs": { "ckpt_name": "a.safetensors" }
                },
                "2": {
                    "class_type": "KSampler",
                    "inputs": { "model": ["1", 0], "seed": 1234, "steps": 25 }
                },
                "10": {
                    "class_type": "SaveImage",
                    "inputs": { "filename_prefix": "output", "images": ["2", 0] }
                }
            })
        );
        assert!(workflow.diagnostics().contains(&Diagnostic::SchemaUnavailable {
            node_id: 3,
            type_name: "Upscale".to_string()
        }));
    }

    #[test]
    fn test_output_is_ordered_by_numeric_id() {
        let compiler = object_info_compiler();
        let workflow = tokio_test::block_on(compiler.compile_json(WORKFLOW_JSON)).unwrap();
        let json = workflow.to_prompt().to_json().unwrap();

        let one = json.find(r#""1":"#).unwrap();
        let two = json.find(r#""2":"#).unwrap();
        let ten = json.find(r#""10":"#).unwrap();
        assert!(one < two && two < ten);
    }

    #[test]
    fn test_compilation_is_idempotent() {
        let compiler = object_info_compiler();
        let first = tokio_test::block_on(compiler.compile_json(WORKFLOW_JSON))
            .unwrap()
            .to_prompt()
            .to_json()
            .unwrap();
        let second = tokio_test::block_on(compiler.compile_json(WORKFLOW_JSON))
            .unwrap()
            .to_prompt()
            .to_json()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_object_form_links() {
        let document = json!({
            "nodes": [
                { "id": 1, "type": "T1", "widgets_values": ["hello"] },
                { "id": 2, "type": "T2", "inputs": [{ "name": "text", "link": 1 }] }
            ],
            "links": [{
                "id": 1, "origin_id": 1, "origin_slot": 0,
                "target_id": 2, "target_slot": 0, "type": "STRING"
            }]
        });
        let workflow = compile(document).unwrap();
        let link = workflow.link(1).unwrap();

        assert_eq!(link.datatype, "STRING");
        assert_eq!(
            workflow.to_prompt().get(2).unwrap().inputs["text"],
            PromptInput::Link("1".to_string(), 0)
        );
    }

    #[test]
    fn test_missing_node_id_is_fatal() {
        let result = RawWorkflow::from_json(r#"{ "nodes": [{ "type": "T1" }], "links": [] }"#);
        assert!(matches!(result, Err(CompileError::JsonParseError(_))));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let compiler = Compiler::new(test_cache());
        let result = tokio_test::block_on(compiler.compile_json("{ nodes: "));
        assert!(matches!(result, Err(CompileError::JsonParseError(_))));
    }

    #[test]
    fn test_duplicate_ids_are_fatal() {
        let nodes = json!({
            "nodes": [{ "id": 1, "type": "T1" }, { "id": 1, "type": "T2" }]
        });
        assert!(matches!(
            compile(nodes),
            Err(CompileError::DuplicateNode(1))
        ));

        let links = json!({
            "nodes": [{ "id": 1, "type": "T1" }, { "id": 2, "type": "T2" }],
            "links": [[1, 1, 0, 2, 0, "STRING"], [1, 1, 0, 2, 0, "STRING"]]
        });
        assert!(matches!(
            compile(links),
            Err(CompileError::DuplicateLink(1))
        ));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let compiler = Compiler::new(test_cache());
        let result = tokio_test::block_on(compiler.compile_file("does/not/exist.json"));
        assert!(matches!(result, Err(CompileError::Io { .. })));
    }

    #[test]
    fn test_empty_document_compiles_to_empty_prompt() {
        let prompt = compile(json!({})).unwrap().to_prompt();
        assert!(prompt.is_empty());
        assert_eq!(prompt.to_json().unwrap(), "{}");
    }
}
