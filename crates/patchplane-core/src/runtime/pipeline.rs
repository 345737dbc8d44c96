// crates/patchplane-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Request Pipeline
// Description: End-to-end orchestration for one configuration request.
// Purpose: Tie identification, the oracle, the engine, and the store together.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! The pipeline drives one request from free text to a persisted document:
//! classify, identify, load schema and values, synthesize edits, filter,
//! apply, validate, replace. All failures are terminal for the request; no
//! oracle or store call is retried, and no partial state is ever visible.
//! Concurrent requests for the same application serialize on a
//! per-application mutex around the read-modify-validate-write sequence so a
//! later replace cannot silently discard an earlier one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Value;
use thiserror::Error;

use crate::core::catalog::AppCatalog;
use crate::core::catalog::AppName;
use crate::core::changeset::parse_change_set;
use crate::interfaces::ChangeOracle;
use crate::interfaces::ConfigStore;
use crate::runtime::engine::PatchError;
use crate::runtime::engine::apply_change_set;
use crate::runtime::filters::DroppedEdit;
use crate::runtime::identify::identify;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Terminal request failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Category labels are stable wire identifiers.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request text maps to no known application, including explicit refusal.
    #[error("identification failed: {0}")]
    IdentificationFailed(String),
    /// Classification or synthesis call failed or timed out.
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(String),
    /// Synthesis reply could not be parsed as a JSON array.
    #[error("oracle reply malformed: {0}")]
    OracleMalformed(String),
    /// Change set was empty or became empty after safety filtering.
    #[error("no viable change in request")]
    NoViableChange,
    /// Merged document failed structural validation.
    #[error("schema validation failed: {0}")]
    SchemaValidationFailed(String),
    /// Store read or replace could not be completed.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
}

impl RequestError {
    /// Returns the stable category label for the failure.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::IdentificationFailed(_) => "identification_failed",
            Self::OracleUnavailable(_) => "oracle_unavailable",
            Self::OracleMalformed(_) => "oracle_malformed",
            Self::NoViableChange => "no_viable_change",
            Self::SchemaValidationFailed(_) => "schema_validation_failed",
            Self::PersistenceFailed(_) => "persistence_failed",
        }
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Successful request outcome.
///
/// # Invariants
/// - `document` is the persisted, schema-valid values document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Application the request resolved to.
    pub app: AppName,
    /// The persisted values document after the patch.
    pub document: Value,
    /// Number of edits applied.
    pub applied: usize,
    /// Edits dropped by the safety filter chain.
    pub dropped: Vec<DroppedEdit>,
    /// Oracle reply entries dropped as malformed before filtering.
    pub malformed: usize,
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Per-request orchestration over injected oracle and store backends.
///
/// # Invariants
/// - Holds no request state between calls beyond per-application locks.
/// - The stored document changes only after validation succeeds.
pub struct PatchPipeline<O, S> {
    /// Change-set oracle backend.
    oracle: O,
    /// Configuration store backend.
    store: S,
    /// Closed application catalog.
    catalog: AppCatalog,
    /// Per-application locks for the read-modify-validate-write sequence.
    locks: Mutex<BTreeMap<String, Arc<Mutex<()>>>>,
}

impl<O, S> PatchPipeline<O, S>
where
    O: ChangeOracle,
    S: ConfigStore,
{
    /// Creates a pipeline over the given backends and catalog.
    #[must_use]
    pub fn new(oracle: O, store: S, catalog: AppCatalog) -> Self {
        Self {
            oracle,
            store,
            catalog,
            locks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the configured catalog.
    #[must_use]
    pub const fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    /// Returns the underlying store for read-only document access.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Handles one free-text configuration request end to end.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] with the failing category; the stored
    /// document is untouched on any failure.
    pub fn handle_request(&self, request_text: &str) -> Result<PipelineOutcome, RequestError> {
        let hint = self
            .oracle
            .classify(request_text, &self.catalog)
            .map_err(|err| RequestError::OracleUnavailable(err.to_string()))?;
        let app = identify(request_text, &hint, &self.catalog)
            .map_err(|err| RequestError::IdentificationFailed(err.to_string()))?;

        let lock = self.app_lock(&app)?;
        let _guard: MutexGuard<'_, ()> = lock
            .lock()
            .map_err(|_| RequestError::PersistenceFailed("application lock poisoned".to_string()))?;

        let schema = self
            .store
            .schema(&app)
            .map_err(|err| RequestError::PersistenceFailed(format!("schema read failed: {err}")))?;
        let values = self
            .store
            .values(&app)
            .map_err(|err| RequestError::PersistenceFailed(format!("values read failed: {err}")))?;

        let raw = self
            .oracle
            .synthesize(request_text, &values)
            .map_err(|err| RequestError::OracleUnavailable(err.to_string()))?;
        let parsed =
            parse_change_set(&raw).map_err(|err| RequestError::OracleMalformed(err.to_string()))?;

        let outcome = apply_change_set(&values, &schema, parsed.edits).map_err(map_patch_error)?;

        self.store.replace_values(&app, &outcome.document).map_err(|err| {
            RequestError::PersistenceFailed(format!("values replace failed: {err}"))
        })?;

        Ok(PipelineOutcome {
            app,
            document: outcome.document,
            applied: outcome.applied,
            dropped: outcome.dropped,
            malformed: parsed.malformed,
        })
    }

    /// Returns the lock for one application, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::PersistenceFailed`] when the lock table is
    /// poisoned.
    fn app_lock(&self, app: &AppName) -> Result<Arc<Mutex<()>>, RequestError> {
        let mut guard = self
            .locks
            .lock()
            .map_err(|_| RequestError::PersistenceFailed("lock table poisoned".to_string()))?;
        Ok(Arc::clone(guard.entry(app.as_str().to_string()).or_default()))
    }
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps engine rejections onto the request taxonomy.
fn map_patch_error(err: PatchError) -> RequestError {
    match err {
        PatchError::NoViableChange => RequestError::NoViableChange,
        PatchError::MalformedBase => {
            RequestError::PersistenceFailed("stored values document root is not an object".to_string())
        }
        PatchError::SchemaCompile(msg) | PatchError::Validation(msg) => {
            RequestError::SchemaValidationFailed(msg)
        }
    }
}
