// crates/patchplane-server/src/main.rs
// ============================================================================
// Module: Server Entry Point
// Description: Argument parsing and process wiring for the patch server.
// Purpose: Assemble catalog, store, oracle, and pipeline, then serve HTTP.
// Dependencies: axum, clap, patchplane-core, patchplane-oracle, patchplane-store-fs, tokio
// ============================================================================

//! ## Overview
//! The binary assembles the deployment: a filesystem store over the data
//! directory, an Ollama oracle with an explicit timeout, the default closed
//! catalog, and the axum route table. Flags fall back to the environment
//! variables the original deployment read (`DATA_DIR`, `OLLAMA_URL`,
//! `MODEL_NAME`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use patchplane_core::AppCatalog;
use patchplane_core::PatchPipeline;
use patchplane_oracle::OllamaOracle;
use patchplane_oracle::OllamaOracleConfig;
use patchplane_server::AppState;
use patchplane_server::NoopMetrics;
use patchplane_server::router;
use patchplane_store_fs::FsStore;
use patchplane_store_fs::FsStoreConfig;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Patchplane configuration server.
#[derive(Debug, Parser)]
#[command(name = "patchplane-server", version, about)]
struct Args {
    /// Listen address for the HTTP surface.
    #[arg(long, default_value = "0.0.0.0:5003")]
    listen: SocketAddr,
    /// Directory holding schema and values documents.
    #[arg(long, env = "DATA_DIR", default_value = "/data")]
    data_dir: PathBuf,
    /// Base URL of the Ollama endpoint.
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,
    /// Model identifier for generation calls.
    #[arg(long, env = "MODEL_NAME", default_value = "llama3")]
    model: String,
    /// Oracle request timeout in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    oracle_timeout_ms: u64,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Server entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => emit_error(&message),
    }
}

/// Assembles the deployment and serves until the listener fails.
async fn run() -> Result<(), String> {
    let args = Args::parse();

    let oracle = OllamaOracle::new(OllamaOracleConfig {
        base_url: args.ollama_url,
        model: args.model,
        timeout_ms: args.oracle_timeout_ms,
        ..OllamaOracleConfig::default()
    })
    .map_err(|err| format!("oracle setup failed: {err}"))?;
    let store = FsStore::new(FsStoreConfig {
        dir: args.data_dir,
    });
    let pipeline = PatchPipeline::new(oracle, store, AppCatalog::default_deployment());

    let state = AppState {
        pipeline: Arc::new(pipeline),
        metrics: Arc::new(NoopMetrics),
    };
    let listener = TcpListener::bind(args.listen)
        .await
        .map_err(|err| format!("listener bind failed on {}: {err}", args.listen))?;
    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server terminated: {err}"))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{message}");
    ExitCode::FAILURE
}
