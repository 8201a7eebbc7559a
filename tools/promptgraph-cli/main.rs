use clap::Parser;
use promptgraph::prelude::*;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Compiles an editor workflow into an execution-ready prompt
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON saved by the editor
    workflow_path: String,

    /// Path to the object_info JSON describing every node type
    #[arg(short = 's', long = "object-info")]
    object_info_path: String,

    /// Optional JSON file overriding the reconciliation rules
    #[arg(short, long = "rules")]
    rules_path: Option<String>,

    /// Write the prompt here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Emit compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Schema and Rule Loading ---
    let object_info = ObjectInfo::from_file(&cli.object_info_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load object info '{}': {}",
            cli.object_info_path, e
        ))
    });
    tracing::info!("Loaded {} node type schemas", object_info.len());
    let rules = match &cli.rules_path {
        Some(path) => ReconcileRules::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load rules: {}", e))),
        None => ReconcileRules::default(),
    };

    // --- 2. Compilation ---
    let cache = Arc::new(SchemaCache::new(Arc::new(StaticSchemaProvider::from(
        object_info,
    ))));
    let compiler = Compiler::builder(cache).with_rules(rules).build();

    let compile_start = Instant::now();
    let workflow = compiler
        .compile_file(&cli.workflow_path)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    let prompt = workflow.to_prompt();
    tracing::info!(
        "Compiled {} prompt nodes in {:?}",
        prompt.len(),
        compile_start.elapsed()
    );

    // --- 3. Output ---
    let json = if cli.compact {
        prompt.to_json()
    } else {
        prompt.to_json_pretty()
    }
    .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    match &cli.output {
        Some(path) => fs::write(path, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write prompt to '{}': {}", path, e))
        }),
        None => println!("{}", json),
    }

    if !workflow.diagnostics().is_empty() {
        eprintln!(
            "{} diagnostic(s) reported while compiling",
            workflow.diagnostics().len()
        );
    }
    tracing::info!("Total execution: {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
