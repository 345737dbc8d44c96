// crates/patchplane-server/tests/server_stack_unit.rs
// ============================================================================
// Module: Server Stack Integration Tests
// Description: Pipeline over the filesystem store with a stub oracle.
// Purpose: Ensure the deployed wiring persists patches and maps failures.
// ============================================================================

//! End-to-end tests over the same pipeline/store composition the binary
//! builds, minus the HTTP listener.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;

use axum::http::StatusCode;
use patchplane_core::AppCatalog;
use patchplane_core::ChangeOracle;
use patchplane_core::ConfigStore;
use patchplane_core::OracleError;
use patchplane_core::PatchPipeline;
use patchplane_server::status_for;
use patchplane_store_fs::FsStore;
use patchplane_store_fs::FsStoreConfig;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Oracle returning canned classification and synthesis replies.
struct StubOracle {
    /// Canned classification hint.
    hint: String,
    /// Canned synthesis reply text.
    reply: String,
}

impl ChangeOracle for StubOracle {
    fn classify(&self, _request_text: &str, _catalog: &AppCatalog) -> Result<String, OracleError> {
        Ok(self.hint.clone())
    }

    fn synthesize(
        &self,
        _request_text: &str,
        _current_values: &Value,
    ) -> Result<String, OracleError> {
        Ok(self.reply.clone())
    }
}

/// Seeds a data directory with tournament documents and builds the pipeline.
fn deployed_pipeline(
    hint: &str,
    reply: &str,
) -> (TempDir, PatchPipeline<StubOracle, FsStore>) {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("tournament.schema.json"),
        serde_json::to_vec_pretty(&json!({
            "type": "object",
            "properties": {
                "workloads": {
                    "type": "object",
                    "properties": {
                        "statefulsets": {
                            "type": "object",
                            "properties": {
                                "tournament": {
                                    "type": "object",
                                    "properties": {
                                        "replicas": {"type": "integer", "minimum": 1}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
        .unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("tournament.value.json"),
        serde_json::to_vec_pretty(&json!({
            "workloads": {"statefulsets": {"tournament": {"replicas": 1}}}
        }))
        .unwrap(),
    )
    .unwrap();

    let store = FsStore::new(FsStoreConfig {
        dir: dir.path().to_path_buf(),
    });
    let oracle = StubOracle {
        hint: hint.to_string(),
        reply: reply.to_string(),
    };
    let pipeline = PatchPipeline::new(oracle, store, AppCatalog::default_deployment());
    (dir, pipeline)
}

// ============================================================================
// SECTION: End-To-End Behavior
// ============================================================================

#[test]
fn successful_request_lands_on_disk() {
    let (dir, pipeline) = deployed_pipeline(
        "tournament",
        r#"[{"path": "workloads.statefulsets.tournament.replicas", "value": 3}]"#,
    );

    let outcome = pipeline.handle_request("scale tournament to 3").unwrap();
    assert_eq!(outcome.applied, 1);

    let raw = fs::read(dir.path().join("tournament.value.json")).unwrap();
    let persisted: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted, outcome.document);
    assert_eq!(persisted["workloads"]["statefulsets"]["tournament"]["replicas"], json!(3));
}

#[test]
fn rejected_request_leaves_the_file_untouched() {
    let (dir, pipeline) = deployed_pipeline(
        "tournament",
        r#"[{"path": "workloads.statefulsets.tournament.replicas", "value": 0}]"#,
    );
    let before = fs::read(dir.path().join("tournament.value.json")).unwrap();

    let err = pipeline.handle_request("scale tournament to 0").unwrap_err();
    assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    assert_eq!(fs::read(dir.path().join("tournament.value.json")).unwrap(), before);
}

#[test]
fn unknown_application_maps_to_not_found() {
    let (_dir, pipeline) = deployed_pipeline("none", "[]");
    let err = pipeline.handle_request("update the unicorn service").unwrap_err();
    assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
}

#[test]
fn unseeded_application_maps_to_internal_error() {
    // Catalog knows "chat" but no documents exist on disk.
    let (_dir, pipeline) = deployed_pipeline("chat", "[]");
    let err = pipeline.handle_request("tweak chat").unwrap_err();
    assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn read_back_through_the_store_matches_the_outcome() {
    let (_dir, pipeline) = deployed_pipeline(
        "tournament",
        r#"[{"path": "workloads.statefulsets.tournament.replicas", "value": 2}]"#,
    );
    let outcome = pipeline.handle_request("scale tournament to 2").unwrap();
    let app = pipeline.catalog().resolve("tournament").unwrap();
    assert_eq!(pipeline.store().values(&app).unwrap(), outcome.document);
}
