// crates/patchplane-core/src/runtime/identify.rs
// ============================================================================
// Module: Application Identifier
// Description: Maps request text plus an oracle hint to a catalog name.
// Purpose: Resolve every request to exactly one known application or fail.
// Dependencies: crate::core::catalog, thiserror
// ============================================================================

//! ## Overview
//! Identification is a pure function over the request text, the oracle's
//! single-token classification hint, and the closed catalog. An explicit
//! `none` hint is a refusal and outranks any coincidental substring match in
//! the request text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::catalog::AppCatalog;
use crate::core::catalog::AppName;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identification failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifyError {
    /// Oracle explicitly refused with the literal `none`.
    #[error("oracle refused: request names no known application")]
    Refused,
    /// Neither the hint nor the request text names a catalog member.
    #[error("request does not match any known application")]
    NotFound,
}

// ============================================================================
// SECTION: Identification
// ============================================================================

/// Resolves a request to a vetted application name.
///
/// Resolution order: normalized hint equal to a catalog name, then a
/// case-insensitive substring scan of the raw request text in catalog order.
/// A normalized hint of `none` refuses before the substring fallback runs.
///
/// # Errors
///
/// Returns [`IdentifyError::Refused`] on an explicit oracle refusal and
/// [`IdentifyError::NotFound`] when nothing resolves.
pub fn identify(
    request_text: &str,
    oracle_hint: &str,
    catalog: &AppCatalog,
) -> Result<AppName, IdentifyError> {
    let hint = normalize_hint(oracle_hint);
    if hint == "none" {
        return Err(IdentifyError::Refused);
    }
    if let Some(app) = catalog.resolve(&hint) {
        return Ok(app);
    }

    let lowered = request_text.to_lowercase();
    for name in catalog.names() {
        if lowered.contains(name) {
            return catalog.resolve(name).ok_or(IdentifyError::NotFound);
        }
    }
    Err(IdentifyError::NotFound)
}

/// Normalizes a hint: trim, lowercase, strip one trailing period.
fn normalize_hint(hint: &str) -> String {
    let trimmed = hint.trim().to_lowercase();
    match trimmed.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => trimmed,
    }
}
