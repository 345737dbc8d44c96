// crates/patchplane-core/src/interfaces/mod.rs
// ============================================================================
// Module: Patchplane Interfaces
// Description: Backend-agnostic interfaces for the oracle and the store.
// Purpose: Define the contract surfaces consumed by the request pipeline.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the pipeline reaches its two external collaborators:
//! the change-set oracle and the configuration store. Both are injected,
//! never hard-wired, so tests substitute deterministic stubs. Oracle output
//! is untrusted free text; the pipeline owns all extraction, filtering, and
//! validation of it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::catalog::AppCatalog;
use crate::core::catalog::AppName;

// ============================================================================
// SECTION: Change Oracle
// ============================================================================

/// Oracle errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Timeouts surface as [`OracleError::Unavailable`].
#[derive(Debug, Error)]
pub enum OracleError {
    /// Oracle call failed or timed out.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// Natural-language oracle proposing classification and edits.
///
/// Implementations return raw text; callers must treat it as untrusted and
/// parse defensively.
pub trait ChangeOracle {
    /// Classifies a request into one catalog token or the literal `none`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the classification call fails.
    fn classify(&self, request_text: &str, catalog: &AppCatalog) -> Result<String, OracleError>;

    /// Proposes a JSON array of `{path, value}` edits for the request.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] when the synthesis call fails.
    fn synthesize(&self, request_text: &str, current_values: &Value)
    -> Result<String, OracleError>;
}

// ============================================================================
// SECTION: Configuration Store
// ============================================================================

/// Configuration store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists for the application.
    #[error("application not found: {0}")]
    NotFound(String),
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
    /// Stored document is corrupt or fails to parse.
    #[error("store invalid data: {0}")]
    Invalid(String),
}

/// Per-application schema and values store.
///
/// `replace_values` is a whole-document replace, never a merge; callers
/// supply the complete merged document.
pub trait ConfigStore {
    /// Loads the structural schema document for an application.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the schema is missing or unreadable.
    fn schema(&self, app: &AppName) -> Result<Value, StoreError>;

    /// Loads the current values document for an application.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the values are missing or unreadable.
    fn values(&self, app: &AppName) -> Result<Value, StoreError>;

    /// Atomically replaces the values document for an application.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the replace cannot be completed; the
    /// previously stored document must remain intact in that case.
    fn replace_values(&self, app: &AppName, document: &Value) -> Result<(), StoreError>;
}
