// crates/patchplane-oracle/tests/ollama_unit.rs
// ============================================================================
// Module: Ollama Oracle Unit Tests
// Description: Generate-call behavior against a local stub server.
// Purpose: Ensure bounded calls fail closed on every transport violation.
// ============================================================================

//! Oracle transport tests over a local `tiny_http` stub and prompt checks.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::thread;

use patchplane_core::AppCatalog;
use patchplane_core::ChangeOracle;
use patchplane_core::OracleError;
use patchplane_oracle::OllamaOracle;
use patchplane_oracle::OllamaOracleConfig;
use patchplane_oracle::classification_prompt;
use patchplane_oracle::synthesis_prompt;
use serde_json::json;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Creates an oracle pointed at a stub server address.
fn oracle_for(base_url: String) -> OllamaOracle {
    OllamaOracle::new(OllamaOracleConfig {
        base_url,
        model: "llama3".to_string(),
        timeout_ms: 5000,
        max_response_bytes: 1024 * 1024,
    })
    .unwrap()
}

/// Serves exactly one request with the given body and status code.
fn one_shot_server(status: u16, body: String) -> (String, thread::JoinHandle<String>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = String::new();
        let _ = request.as_reader().read_to_string(&mut received);
        let response = Response::from_string(body).with_status_code(status);
        let _ = request.respond(response);
        received
    });
    (format!("http://{addr}"), handle)
}

// ============================================================================
// SECTION: Successful Calls
// ============================================================================

#[test]
fn classify_returns_the_trimmed_reply() {
    let body = json!({"response": "  tournament\n"}).to_string();
    let (url, handle) = one_shot_server(200, body);

    let oracle = oracle_for(url);
    let hint = oracle.classify("scale tournament", &AppCatalog::default_deployment()).unwrap();
    assert_eq!(hint, "tournament");

    let received = handle.join().unwrap();
    assert!(received.contains("\"model\":\"llama3\""));
    assert!(received.contains("\"stream\":false"));
}

#[test]
fn synthesize_posts_to_the_generate_endpoint() {
    let body = json!({"response": "[{\"path\": \"a\", \"value\": 1}]"}).to_string();
    let (url, handle) = one_shot_server(200, body);

    // Trailing slash on the base URL must not double up in the path.
    let oracle = oracle_for(format!("{url}/"));
    let reply = oracle.synthesize("bump a", &json!({"a": 0})).unwrap();
    assert_eq!(reply, "[{\"path\": \"a\", \"value\": 1}]");

    let received = handle.join().unwrap();
    assert!(received.contains("bump a"));
}

#[test]
fn missing_response_field_yields_an_empty_reply() {
    let (url, handle) = one_shot_server(200, json!({"done": true}).to_string());
    let oracle = oracle_for(url);
    let reply = oracle.synthesize("anything", &json!({})).unwrap();
    assert_eq!(reply, "");
    let _ = handle.join();
}

// ============================================================================
// SECTION: Fail-Closed Transport
// ============================================================================

#[test]
fn non_success_status_is_unavailable() {
    let (url, handle) = one_shot_server(500, "model exploded".to_string());
    let oracle = oracle_for(url);
    let err = oracle.classify("anything", &AppCatalog::default_deployment()).unwrap_err();
    let OracleError::Unavailable(msg) = err;
    assert!(msg.contains("500"), "unexpected message: {msg}");
    let _ = handle.join();
}

#[test]
fn oversized_reply_is_unavailable() {
    let padding = "x".repeat(4096);
    let body = json!({"response": padding}).to_string();
    let (url, handle) = one_shot_server(200, body);

    let oracle = OllamaOracle::new(OllamaOracleConfig {
        base_url: url,
        max_response_bytes: 1024,
        ..OllamaOracleConfig::default()
    })
    .unwrap();
    let err = oracle.classify("anything", &AppCatalog::default_deployment()).unwrap_err();
    let OracleError::Unavailable(msg) = err;
    assert!(msg.contains("size limit"), "unexpected message: {msg}");
    let _ = handle.join();
}

#[test]
fn undecodable_reply_body_is_unavailable() {
    let (url, handle) = one_shot_server(200, "not json at all".to_string());
    let oracle = oracle_for(url);
    let err = oracle.classify("anything", &AppCatalog::default_deployment()).unwrap_err();
    let OracleError::Unavailable(msg) = err;
    assert!(msg.contains("undecodable"), "unexpected message: {msg}");
    let _ = handle.join();
}

#[test]
fn unreachable_endpoint_is_unavailable() {
    // Port 1 is not listening; the call must fail, not hang.
    let oracle = OllamaOracle::new(OllamaOracleConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_ms: 500,
        ..OllamaOracleConfig::default()
    })
    .unwrap();
    let result = oracle.classify("anything", &AppCatalog::default_deployment());
    assert!(result.is_err());
}

// ============================================================================
// SECTION: Prompt Construction
// ============================================================================

#[test]
fn classification_prompt_lists_the_catalog_and_refusal_rule() {
    let prompt =
        classification_prompt("set tournament memory", &AppCatalog::default_deployment());
    assert!(prompt.contains("'tournament', 'matchmaking', 'chat'"));
    assert!(prompt.contains("set tournament memory"));
    assert!(prompt.contains("'none'"));
}

#[test]
fn synthesis_prompt_embeds_the_request_and_current_values() {
    let values = json!({"workloads": {"replicas": 1}});
    let prompt = synthesis_prompt("scale to 3 replicas", &values);
    assert!(prompt.contains("scale to 3 replicas"));
    assert!(prompt.contains("\"replicas\""));
    assert!(prompt.contains("JSON array"));
}
