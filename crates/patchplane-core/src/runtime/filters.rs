// crates/patchplane-core/src/runtime/filters.rs
// ============================================================================
// Module: Safety Filter Chain
// Description: Ordered predicate chain deciding which edits survive.
// Purpose: Keep untrusted edits inside the mutable shape of the document.
// Dependencies: crate::core::changeset, serde_json
// ============================================================================

//! ## Overview
//! Each edit is evaluated against an ordered chain of independent predicates.
//! A rejecting filter drops the edit; the drop is recorded but never aborts
//! the request. Filters see the *base* document, so root containment is
//! judged against the stored shape rather than any partially applied state.
//! New filters slot into [`SAFETY_FILTERS`] without touching existing ones.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::core::changeset::Edit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Root namespace where resource and replica attributes are disallowed.
pub const RESTRICTED_ROOT: &str = "services";

/// Namespace segment that must contain resource and env edits.
pub const CONTAINER_NAMESPACE: &str = "containers";

/// Environment-variable marker term.
const ENVS_TERM: &str = "envs";

/// Resource-sizing marker term.
const RESOURCES_TERM: &str = "resources";

/// Sensitive terms disallowed under the restricted root.
const SENSITIVE_TERMS: [&str; 3] = ["memory", "cpu", "replicas"];

// ============================================================================
// SECTION: Filter Chain
// ============================================================================

/// One named safety filter.
///
/// # Invariants
/// - `rejects` is a pure predicate over the base document and the edit.
struct SafetyFilter {
    /// Stable filter name used in drop records.
    name: &'static str,
    /// Returns true when the edit must be dropped.
    rejects: fn(&Map<String, Value>, &Edit) -> bool,
}

/// The ordered filter chain. Order matters: root containment is judged
/// before namespace rules.
const SAFETY_FILTERS: &[SafetyFilter] = &[
    SafetyFilter {
        name: "root-key",
        rejects: rejects_unknown_root,
    },
    SafetyFilter {
        name: "restricted-subtree",
        rejects: rejects_restricted_subtree,
    },
    SafetyFilter {
        name: "envs-containment",
        rejects: rejects_uncontained_envs,
    },
    SafetyFilter {
        name: "resources-containment",
        rejects: rejects_uncontained_resources,
    },
];

// ============================================================================
// SECTION: Outcome Types
// ============================================================================

/// Record of one dropped edit.
///
/// # Invariants
/// - `filter` names an entry of the filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdit {
    /// Dotted path of the rejected edit.
    pub path: String,
    /// Name of the filter that rejected it.
    pub filter: &'static str,
}

/// Result of running the filter chain over a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Surviving edits in original order.
    pub kept: Vec<Edit>,
    /// Dropped edits with the rejecting filter name.
    pub dropped: Vec<DroppedEdit>,
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Runs every edit through the filter chain in order.
#[must_use]
pub fn filter_change_set(base: &Map<String, Value>, edits: Vec<Edit>) -> FilterOutcome {
    let mut kept = Vec::with_capacity(edits.len());
    let mut dropped = Vec::new();
    for edit in edits {
        match rejecting_filter(base, &edit) {
            Some(filter) => dropped.push(DroppedEdit {
                path: edit.dotted_path(),
                filter,
            }),
            None => kept.push(edit),
        }
    }
    FilterOutcome {
        kept,
        dropped,
    }
}

/// Returns the name of the first rejecting filter, if any.
fn rejecting_filter(base: &Map<String, Value>, edit: &Edit) -> Option<&'static str> {
    SAFETY_FILTERS
        .iter()
        .find(|filter| (filter.rejects)(base, edit))
        .map(|filter| filter.name)
}

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Drops edits whose first segment is not an existing top-level key. The
/// patch mechanism may modify existing structure, never extend the root.
fn rejects_unknown_root(base: &Map<String, Value>, edit: &Edit) -> bool {
    !base.contains_key(edit.root_segment())
}

/// Drops resource-sizing and replica edits under the restricted root; those
/// attributes may only be set within the container namespace.
fn rejects_restricted_subtree(_base: &Map<String, Value>, edit: &Edit) -> bool {
    if edit.root_segment() != RESTRICTED_ROOT {
        return false;
    }
    let dotted = edit.dotted_path();
    SENSITIVE_TERMS.iter().any(|term| dotted.contains(term))
}

/// Drops env-var edits whose path never enters the container namespace.
fn rejects_uncontained_envs(_base: &Map<String, Value>, edit: &Edit) -> bool {
    let dotted = edit.dotted_path();
    dotted.contains(ENVS_TERM) && !dotted.contains(CONTAINER_NAMESPACE)
}

/// Drops resource edits whose path never enters the container namespace.
fn rejects_uncontained_resources(_base: &Map<String, Value>, edit: &Edit) -> bool {
    let dotted = edit.dotted_path();
    dotted.contains(RESOURCES_TERM) && !dotted.contains(CONTAINER_NAMESPACE)
}
