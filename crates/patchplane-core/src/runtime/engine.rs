// crates/patchplane-core/src/runtime/engine.rs
// ============================================================================
// Module: Patch Engine
// Description: Applies filtered edits to a copy and validates the result.
// Purpose: Guarantee all-or-nothing, schema-valid configuration mutation.
// Dependencies: crate::core::changeset, crate::runtime::filters, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! The patch engine takes a candidate change set, runs the safety filter
//! chain, materializes surviving edits onto a private copy of the base
//! document, and validates the fully mutated copy against the application
//! schema. The base document is never touched; callers persist the returned
//! copy only on success. An empty change set, before or after filtering, is
//! a rejection rather than a silent no-op success.
//!
//! Numeric normalization (memory in whole MiB, CPU in whole milli-CPU) is a
//! contract the oracle honors upstream; the engine performs no unit
//! conversion and relies on schema validation for type checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::changeset::Edit;
use crate::runtime::filters::DroppedEdit;
use crate::runtime::filters::filter_change_set;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Patch engine rejections.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Any rejection leaves the base document untouched.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Change set was empty, or every edit was dropped by the filter chain.
    #[error("no viable change in request")]
    NoViableChange,
    /// Base values document root is not a JSON object.
    #[error("base values document root is not an object")]
    MalformedBase,
    /// Schema document failed to compile.
    #[error("schema compile failed: {0}")]
    SchemaCompile(String),
    /// Mutated document failed structural validation.
    #[error("schema validation failed: {0}")]
    Validation(String),
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Successful patch application.
///
/// # Invariants
/// - `document` validated against the supplied schema.
/// - `applied` counts the edits materialized into `document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// The fully mutated, schema-valid document ready for persistence.
    pub document: Value,
    /// Number of edits applied.
    pub applied: usize,
    /// Edits dropped by the safety filter chain.
    pub dropped: Vec<DroppedEdit>,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Filters, applies, and validates a change set against a base document.
///
/// # Errors
///
/// Returns [`PatchError::NoViableChange`] when no edit survives,
/// [`PatchError::MalformedBase`] when the base root is not an object, and
/// [`PatchError::Validation`] with the validator diagnostic when the mutated
/// copy fails the schema.
pub fn apply_change_set(
    base: &Value,
    schema: &Value,
    change_set: Vec<Edit>,
) -> Result<PatchOutcome, PatchError> {
    if change_set.is_empty() {
        return Err(PatchError::NoViableChange);
    }
    let Value::Object(base_map) = base else {
        return Err(PatchError::MalformedBase);
    };

    let outcome = filter_change_set(base_map, change_set);
    if outcome.kept.is_empty() {
        // All edits dropped is indistinguishable from an empty proposal.
        return Err(PatchError::NoViableChange);
    }

    let mut working = base.clone();
    for edit in &outcome.kept {
        set_path(&mut working, &edit.path, &edit.value);
    }

    validate_document(schema, &working)?;
    Ok(PatchOutcome {
        document: working,
        applied: outcome.kept.len(),
        dropped: outcome.dropped,
    })
}

// ============================================================================
// SECTION: Tree Mutation
// ============================================================================

/// Sets a value at a dotted path, creating intermediate mappings as needed.
///
/// Existing mapping nodes are reused; anything else on the walk (missing
/// keys, scalar or array intermediates) is replaced by an empty mapping.
/// The leaf is overwritten unconditionally.
fn set_path(node: &mut Value, path: &[String], value: &Value) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let Value::Object(map) = node else {
        return;
    };
    if rest.is_empty() {
        map.insert(head.clone(), value.clone());
        return;
    }
    let child = map.entry(head.clone()).or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    set_path(child, rest, value);
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a document against a structural schema.
///
/// # Errors
///
/// Returns [`PatchError::SchemaCompile`] when the schema cannot be compiled
/// and [`PatchError::Validation`] with the first diagnostic on failure.
fn validate_document(schema: &Value, document: &Value) -> Result<(), PatchError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|err| PatchError::SchemaCompile(err.to_string()))?;
    validator.validate(document).map_err(|err| PatchError::Validation(err.to_string()))
}
