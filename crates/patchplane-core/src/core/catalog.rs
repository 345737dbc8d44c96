// crates/patchplane-core/src/core/catalog.rs
// ============================================================================
// Module: Application Catalog
// Description: Closed set of managed application names.
// Purpose: Guarantee every configuration operation resolves to a known name.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The catalog holds the closed set of application names known at deployment
//! time. Every request must resolve to exactly one catalog member before any
//! configuration document is touched. [`AppName`] values are only produced by
//! catalog resolution, so holding one proves the name was vetted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Application Name
// ============================================================================

/// Vetted application name drawn from the closed catalog.
///
/// # Invariants
/// - Lowercase ASCII alphanumeric, non-empty.
/// - Only constructed through [`AppCatalog::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppName(String);

impl AppName {
    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Catalog Errors
// ============================================================================

/// Catalog construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog must contain at least one name.
    #[error("application catalog is empty")]
    Empty,
    /// Name violates the lowercase alphanumeric contract.
    #[error("invalid application name: {0}")]
    InvalidName(String),
    /// Name appears more than once.
    #[error("duplicate application name: {0}")]
    Duplicate(String),
}

// ============================================================================
// SECTION: Application Catalog
// ============================================================================

/// Closed, ordered set of known application names.
///
/// # Invariants
/// - Names are unique, lowercase ASCII alphanumeric, non-empty.
/// - Iteration order is construction order; the substring fallback in
///   identification scans names in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCatalog {
    /// Known names in construction order.
    names: Vec<String>,
}

impl AppCatalog {
    /// Creates a catalog from an ordered list of names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the list is empty, a name is not
    /// lowercase ASCII alphanumeric, or a name repeats.
    pub fn new<I, T>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut vetted: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !is_valid_name(&name) {
                return Err(CatalogError::InvalidName(name));
            }
            if vetted.contains(&name) {
                return Err(CatalogError::Duplicate(name));
            }
            vetted.push(name);
        }
        if vetted.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            names: vetted,
        })
    }

    /// Returns the default deployment catalog.
    #[must_use]
    pub fn default_deployment() -> Self {
        Self {
            names: vec![
                "tournament".to_string(),
                "matchmaking".to_string(),
                "chat".to_string(),
            ],
        }
    }

    /// Returns true when the exact name is a catalog member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }

    /// Resolves an exact name to a vetted [`AppName`].
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<AppName> {
        self.contains(name).then(|| AppName(name.to_string()))
    }

    /// Iterates the known names in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for AppCatalog {
    fn default() -> Self {
        Self::default_deployment()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the name is non-empty lowercase ASCII alphanumeric.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
