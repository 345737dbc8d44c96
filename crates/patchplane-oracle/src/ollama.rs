// crates/patchplane-oracle/src/ollama.rs
// ============================================================================
// Module: Ollama Oracle
// Description: ChangeOracle implementation over the Ollama generate API.
// Purpose: Issue bounded blocking generation calls with strict limits.
// Dependencies: patchplane-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! The Ollama oracle posts prompts to `{base_url}/api/generate` with
//! streaming disabled and returns the trimmed `response` field. Requests
//! carry an explicit timeout and responses are read under a hard byte cap;
//! both violations fail closed as [`OracleError::Unavailable`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use patchplane_core::AppCatalog;
use patchplane_core::ChangeOracle;
use patchplane_core::OracleError;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::prompts::classification_prompt;
use crate::prompts::synthesis_prompt;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the Ollama oracle.
///
/// # Invariants
/// - `timeout_ms` applies to the full request lifecycle.
/// - `max_response_bytes` is a hard upper bound on reply bodies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaOracleConfig {
    /// Base URL of the Ollama endpoint.
    pub base_url: String,
    /// Model identifier passed on every generation call.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum reply size allowed, in bytes.
    pub max_response_bytes: usize,
}

impl Default for OllamaOracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_ms: 30_000,
            max_response_bytes: 1024 * 1024,
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Request body for the generate endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    /// Model identifier.
    model: &'a str,
    /// Prompt text.
    prompt: &'a str,
    /// Streaming disabled; one complete reply per call.
    stream: bool,
}

/// Reply body from the generate endpoint.
#[derive(Debug, Deserialize)]
struct GenerateReply {
    /// Generated text.
    #[serde(default)]
    response: String,
}

// ============================================================================
// SECTION: Oracle Implementation
// ============================================================================

/// Blocking change oracle backed by an Ollama-compatible endpoint.
///
/// # Invariants
/// - Every call is bounded by the configured timeout and size cap.
/// - Replies are returned verbatim (trimmed); parsing happens in the core.
pub struct OllamaOracle {
    /// Oracle configuration.
    config: OllamaOracleConfig,
    /// HTTP client used for generation calls.
    client: Client,
}

impl OllamaOracle {
    /// Creates a new oracle with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Unavailable`] when the HTTP client cannot be
    /// built.
    pub fn new(config: OllamaOracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|_| OracleError::Unavailable("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Issues one bounded generation call and returns the trimmed reply.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Unavailable`] on transport failure, timeout,
    /// non-success status, oversized reply, or an undecodable reply body.
    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        let payload = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .map_err(|err| OracleError::Unavailable(format!("generate call failed: {err}")))?;
        if !response.status().is_success() {
            return Err(OracleError::Unavailable(format!(
                "generate call returned status {}",
                response.status()
            )));
        }
        let body = read_response_limited(response, self.config.max_response_bytes)?;
        let reply: GenerateReply = serde_json::from_slice(&body)
            .map_err(|err| OracleError::Unavailable(format!("generate reply undecodable: {err}")))?;
        Ok(reply.response.trim().to_string())
    }
}

impl ChangeOracle for OllamaOracle {
    fn classify(&self, request_text: &str, catalog: &AppCatalog) -> Result<String, OracleError> {
        self.generate(&classification_prompt(request_text, catalog))
    }

    fn synthesize(
        &self,
        request_text: &str,
        current_values: &Value,
    ) -> Result<String, OracleError> {
        self.generate(&synthesis_prompt(request_text, current_values))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the reply body while enforcing a byte limit.
fn read_response_limited(response: Response, max_bytes: usize) -> Result<Vec<u8>, OracleError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| OracleError::Unavailable("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(OracleError::Unavailable("reply exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|_| OracleError::Unavailable("failed to read reply".to_string()))?;
    if buf.len() > max_bytes {
        return Err(OracleError::Unavailable("reply exceeds size limit".to_string()));
    }
    Ok(buf)
}
