// crates/patchplane-oracle/src/lib.rs
// ============================================================================
// Module: Patchplane Oracle
// Description: Blocking HTTP ChangeOracle backed by an Ollama endpoint.
// Purpose: Turn pipeline queries into bounded model-generation calls.
// Dependencies: patchplane-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate implements [`patchplane_core::ChangeOracle`] over the Ollama
//! `/api/generate` endpoint. Calls are blocking with an explicit timeout and
//! a hard response-size cap; timeout expiry and transport failures surface
//! as [`patchplane_core::OracleError::Unavailable`]. Prompt construction
//! lives here so the core stays free of model-facing text.
//!
//! Security posture: model replies are untrusted free text; this crate only
//! transports them. All extraction and validation happens in the core.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod ollama;
pub mod prompts;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use ollama::OllamaOracle;
pub use ollama::OllamaOracleConfig;
pub use prompts::classification_prompt;
pub use prompts::synthesis_prompt;
