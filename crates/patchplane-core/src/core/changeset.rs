// crates/patchplane-core/src/core/changeset.rs
// ============================================================================
// Module: Change Sets
// Description: Ordered path/value edits and oracle reply parsing.
// Purpose: Turn untrusted oracle text into a vetted list of edits.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! A change set is the ordered list of path/value edits proposed for one
//! request. Change sets are ephemeral and never persisted. Oracle replies are
//! not guaranteed to be bare JSON, so parsing first extracts the outermost
//! `[` .. `]` span before decoding. Individually malformed entries are
//! dropped rather than failing the whole reply; only a reply with no usable
//! array at all is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Edit
// ============================================================================

/// One proposed edit: a dotted path and a replacement value.
///
/// # Invariants
/// - `path` is non-empty and every segment is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Path segments from the document root to the target leaf.
    pub path: Vec<String>,
    /// Replacement value for the leaf; any JSON value.
    pub value: Value,
}

impl Edit {
    /// Creates an edit from a dotted path, rejecting empty segments.
    #[must_use]
    pub fn from_dotted(dotted: &str, value: Value) -> Option<Self> {
        let path = parse_dotted_path(dotted)?;
        Some(Self {
            path,
            value,
        })
    }

    /// Returns the first path segment.
    ///
    /// # Invariants
    /// - `path` is non-empty by construction, so a segment always exists.
    #[must_use]
    pub fn root_segment(&self) -> &str {
        self.path.first().map_or("", String::as_str)
    }

    /// Returns the dotted wire form of the path.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Splits a dotted path into segments, rejecting empty or blank segments.
fn parse_dotted_path(dotted: &str) -> Option<Vec<String>> {
    if dotted.trim().is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for segment in dotted.split('.') {
        if segment.trim().is_empty() {
            return None;
        }
        segments.push(segment.to_string());
    }
    Some(segments)
}

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Change-set parsing errors for oracle replies.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// Reply text contains no `[` .. `]` span.
    #[error("oracle reply contains no JSON array")]
    MissingArray,
    /// Extracted span is not valid JSON.
    #[error("oracle reply is not valid JSON: {0}")]
    InvalidJson(String),
    /// Extracted span decoded to something other than an array.
    #[error("oracle reply is not a JSON array")]
    NotArray,
}

// ============================================================================
// SECTION: Reply Parsing
// ============================================================================

/// Parsed change set plus a count of entries dropped as malformed.
///
/// # Invariants
/// - Every edit in `edits` satisfies the [`Edit`] path invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChangeSet {
    /// Well-formed edits in reply order.
    pub edits: Vec<Edit>,
    /// Number of array entries dropped as malformed.
    pub malformed: usize,
}

/// Extracts the outermost `[` .. `]` span from raw oracle text.
#[must_use]
pub fn extract_array_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parses raw oracle text into a change set.
///
/// Entries missing `path` or `value`, with a non-string `path`, or with
/// empty path segments are dropped and counted, not fatal.
///
/// # Errors
///
/// Returns [`ChangeSetError`] when no array span exists, the span is not
/// valid JSON, or the decoded value is not an array.
pub fn parse_change_set(raw: &str) -> Result<ParsedChangeSet, ChangeSetError> {
    let span = extract_array_span(raw).ok_or(ChangeSetError::MissingArray)?;
    let decoded: Value =
        serde_json::from_str(span).map_err(|err| ChangeSetError::InvalidJson(err.to_string()))?;
    let Value::Array(entries) = decoded else {
        return Err(ChangeSetError::NotArray);
    };

    let mut edits = Vec::with_capacity(entries.len());
    let mut malformed = 0;
    for entry in entries {
        match parse_entry(entry) {
            Some(edit) => edits.push(edit),
            None => malformed += 1,
        }
    }
    Ok(ParsedChangeSet {
        edits,
        malformed,
    })
}

/// Parses one array entry into an edit, returning `None` when malformed.
fn parse_entry(entry: Value) -> Option<Edit> {
    let Value::Object(mut map) = entry else {
        return None;
    };
    let value = map.remove("value")?;
    let Some(Value::String(dotted)) = map.remove("path") else {
        return None;
    };
    Edit::from_dotted(&dotted, value)
}
