//! kgterms CLI - knowledge-graph keyword enrichment and term extraction
//!
//! Every subcommand takes one JSON-encoded payload and writes exactly one
//! JSON document to stdout. Errors surface inside that document's `success`
//! flag; the exit code is non-zero only when the payload itself is missing
//! or not valid JSON. Logs go to stderr.

use clap::{Parser, Subcommand};
use kgterms_core::config::Config;
use kgterms_core::phrases::{self, PhrasesRequest};
use kgterms_core::pipeline::{EnrichRequest, Pipeline};
use serde_json::{Value, json};

#[derive(Parser)]
#[command(name = "kgterms")]
#[command(author, version, about = "Knowledge-graph keyword enrichment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve keywords against knowledge providers and derive term lists
    Enrich {
        /// JSON-encoded request object
        payload: Option<String>,
    },

    /// Extract dominant n-gram phrases from a block of text
    Phrases {
        /// JSON-encoded request object
        payload: Option<String>,
    },
}

/// Print the payload-level error envelope and exit 1
fn payload_error(message: String) -> ! {
    println!("{}", json!({ "success": false, "error": message }));
    std::process::exit(1);
}

/// Parse the positional payload, exiting 1 when it is missing or not JSON
fn parse_payload(payload: Option<String>) -> Value {
    let Some(raw) = payload else {
        payload_error("Missing input data argument".to_string());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => payload_error(format!("Invalid JSON input: {e}")),
    }
}

async fn cmd_enrich(payload: Option<String>) -> anyhow::Result<()> {
    let value = parse_payload(payload);

    // A well-formed JSON document with the wrong shape is a pipeline-level
    // failure, reported in the envelope with exit code 0
    let request: EnrichRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            println!(
                "{}",
                json!({
                    "success": false,
                    "error": format!("Invalid input: {e}"),
                    "debug_info": { "queries": [], "has_api_key": false },
                })
            );
            return Ok(());
        }
    };

    let pipeline = match Pipeline::new(Config::default()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            println!(
                "{}",
                json!({
                    "success": false,
                    "error": e.to_string(),
                    "debug_info": { "queries": [], "has_api_key": false },
                })
            );
            return Ok(());
        }
    };
    let report = pipeline.run(&request).await;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_phrases(payload: Option<String>) -> anyhow::Result<()> {
    let value = parse_payload(payload);

    let request: PhrasesRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            println!(
                "{}",
                json!({ "success": false, "error": format!("Invalid input: {e}") })
            );
            return Ok(());
        }
    };

    let report = phrases::run(&request);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the JSON document; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kgterms_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enrich { payload } => cmd_enrich(payload).await,
        Commands::Phrases { payload } => cmd_phrases(payload),
    }
}
