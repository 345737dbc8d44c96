// crates/patchplane-server/src/routes.rs
// ============================================================================
// Module: Server Routes
// Description: axum handlers for messages, documents, and probes.
// Purpose: Map HTTP requests onto the pipeline and store contracts.
// Dependencies: axum, patchplane-core, serde, serde_json, tokio
// ============================================================================

//! ## Overview
//! Route handlers stay thin: extract input, run the blocking pipeline on the
//! blocking pool, and translate outcomes into status codes and JSON bodies.
//! Failures carry a human-readable message plus the stable category label so
//! callers can branch without parsing prose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use patchplane_core::ChangeOracle;
use patchplane_core::ConfigStore;
use patchplane_core::PatchPipeline;
use patchplane_core::RequestError;
use patchplane_core::StoreError;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::telemetry::MetricsSink;
use crate::telemetry::RequestOutcome;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state handed to every route handler.
pub struct AppState<O, S> {
    /// The request pipeline over the configured backends.
    pub pipeline: Arc<PatchPipeline<O, S>>,
    /// Metrics sink for request telemetry.
    pub metrics: Arc<dyn MetricsSink + Send + Sync>,
}

impl<O, S> Clone for AppState<O, S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Message request body; `input` preferred, `text` accepted.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Request text under the primary key.
    #[serde(default)]
    input: Option<String>,
    /// Request text under the legacy key.
    #[serde(default)]
    text: Option<String>,
}

impl MessageRequest {
    /// Returns the effective request text, if any.
    pub(crate) fn request_text(self) -> Option<String> {
        self.input
            .or(self.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the route table over the given state.
pub fn router<O, S>(state: AppState<O, S>) -> Router
where
    O: ChangeOracle + Send + Sync + 'static,
    S: ConfigStore + Send + Sync + 'static,
{
    Router::new()
        .route("/message", post(handle_message::<O, S>))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/schemas/{app}", get(get_schema::<O, S>))
        .route("/values/{app}", get(get_values::<O, S>))
        .with_state(state)
}

// ============================================================================
// SECTION: Probe Handlers
// ============================================================================

/// Liveness probe.
async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"success": true, "status": "healthy"})))
}

/// Readiness probe.
async fn ready() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"success": true, "status": "ready"})))
}

// ============================================================================
// SECTION: Message Handler
// ============================================================================

/// Handles one free-text configuration request.
async fn handle_message<O, S>(
    State(state): State<AppState<O, S>>,
    Json(body): Json<MessageRequest>,
) -> (StatusCode, Json<Value>)
where
    O: ChangeOracle + Send + Sync + 'static,
    S: ConfigStore + Send + Sync + 'static,
{
    let Some(request_text) = body.request_text() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "no input provided", "category": "bad_request"})),
        );
    };

    let pipeline = Arc::clone(&state.pipeline);
    let joined =
        tokio::task::spawn_blocking(move || pipeline.handle_request(&request_text)).await;
    let result = match joined {
        Ok(result) => result,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "request task failed", "category": "internal"})),
            );
        }
    };

    match result {
        Ok(outcome) => {
            state.metrics.record_request(RequestOutcome {
                category: "ok",
                dropped_edits: outcome.dropped.len(),
                malformed_entries: outcome.malformed,
            });
            (StatusCode::OK, Json(outcome.document))
        }
        Err(err) => {
            state.metrics.record_request(RequestOutcome {
                category: err.category(),
                dropped_edits: 0,
                malformed_entries: 0,
            });
            (
                status_for(&err),
                Json(json!({"error": err.to_string(), "category": err.category()})),
            )
        }
    }
}

/// Maps a request failure onto an HTTP status code.
#[must_use]
pub const fn status_for(err: &RequestError) -> StatusCode {
    match err {
        RequestError::IdentificationFailed(_) => StatusCode::NOT_FOUND,
        RequestError::OracleUnavailable(_) | RequestError::OracleMalformed(_) => {
            StatusCode::BAD_GATEWAY
        }
        RequestError::NoViableChange => StatusCode::UNPROCESSABLE_ENTITY,
        RequestError::SchemaValidationFailed(_) => StatusCode::BAD_REQUEST,
        RequestError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// SECTION: Document Handlers
// ============================================================================

/// Serves an application's schema document read-only.
async fn get_schema<O, S>(
    State(state): State<AppState<O, S>>,
    Path(app): Path<String>,
) -> (StatusCode, Json<Value>)
where
    O: ChangeOracle + Send + Sync + 'static,
    S: ConfigStore + Send + Sync + 'static,
{
    read_document(state, app, DocumentKind::Schema).await
}

/// Serves an application's values document read-only.
async fn get_values<O, S>(
    State(state): State<AppState<O, S>>,
    Path(app): Path<String>,
) -> (StatusCode, Json<Value>)
where
    O: ChangeOracle + Send + Sync + 'static,
    S: ConfigStore + Send + Sync + 'static,
{
    read_document(state, app, DocumentKind::Values).await
}

/// Stored document kinds served read-only.
#[derive(Debug, Clone, Copy)]
enum DocumentKind {
    /// Structural schema document.
    Schema,
    /// Current values document.
    Values,
}

/// Resolves the application and reads one stored document.
async fn read_document<O, S>(
    state: AppState<O, S>,
    app: String,
    kind: DocumentKind,
) -> (StatusCode, Json<Value>)
where
    O: ChangeOracle + Send + Sync + 'static,
    S: ConfigStore + Send + Sync + 'static,
{
    let Some(app) = state.pipeline.catalog().resolve(&app) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("application not found: {app}"), "category": "not_found"})),
        );
    };

    let pipeline = Arc::clone(&state.pipeline);
    let joined = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Schema => pipeline.store().schema(&app),
        DocumentKind::Values => pipeline.store().values(&app),
    })
    .await;
    match joined {
        Ok(Ok(document)) => (StatusCode::OK, Json(document)),
        Ok(Err(err)) => {
            let status = match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Io(_) | StoreError::Invalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({"error": err.to_string(), "category": "store"})))
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "read task failed", "category": "internal"})),
        ),
    }
}
