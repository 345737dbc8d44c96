// crates/patchplane-server/src/tests.rs
// ============================================================================
// Module: Server Unit Tests
// Description: Status mapping and request-body extraction tests.
// Purpose: Keep the HTTP contract stable without spinning up a listener.
// ============================================================================

//! Unit tests for error-to-status mapping and message body handling.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use axum::http::StatusCode;
use patchplane_core::RequestError;
use serde_json::json;

use crate::routes::MessageRequest;
use crate::routes::status_for;

// ============================================================================
// SECTION: Status Mapping
// ============================================================================

#[test]
fn identification_failures_map_to_not_found() {
    let err = RequestError::IdentificationFailed("no match".to_string());
    assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
    assert_eq!(err.category(), "identification_failed");
}

#[test]
fn oracle_failures_map_to_bad_gateway() {
    let unavailable = RequestError::OracleUnavailable("timeout".to_string());
    let malformed = RequestError::OracleMalformed("no array".to_string());
    assert_eq!(status_for(&unavailable), StatusCode::BAD_GATEWAY);
    assert_eq!(status_for(&malformed), StatusCode::BAD_GATEWAY);
}

#[test]
fn no_viable_change_maps_to_unprocessable() {
    assert_eq!(status_for(&RequestError::NoViableChange), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(RequestError::NoViableChange.category(), "no_viable_change");
}

#[test]
fn validation_and_persistence_statuses_are_distinct() {
    let validation = RequestError::SchemaValidationFailed("replicas type".to_string());
    let persistence = RequestError::PersistenceFailed("disk full".to_string());
    assert_eq!(status_for(&validation), StatusCode::BAD_REQUEST);
    assert_eq!(status_for(&persistence), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// SECTION: Message Body
// ============================================================================

#[test]
fn message_body_prefers_input_over_text() {
    let body: MessageRequest =
        serde_json::from_value(json!({"input": "set chat cpu", "text": "ignored"})).unwrap();
    assert_eq!(body.request_text().as_deref(), Some("set chat cpu"));
}

#[test]
fn message_body_accepts_legacy_text_key() {
    let body: MessageRequest = serde_json::from_value(json!({"text": " set chat cpu "})).unwrap();
    assert_eq!(body.request_text().as_deref(), Some("set chat cpu"));
}

#[test]
fn message_body_rejects_missing_and_blank_input() {
    let missing: MessageRequest = serde_json::from_value(json!({})).unwrap();
    assert_eq!(missing.request_text(), None);
    let blank: MessageRequest = serde_json::from_value(json!({"input": "   "})).unwrap();
    assert_eq!(blank.request_text(), None);
}
