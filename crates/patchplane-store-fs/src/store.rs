// crates/patchplane-store-fs/src/store.rs
// ============================================================================
// Module: Filesystem Store
// Description: ConfigStore backed by per-application JSON files.
// Purpose: Durable document storage with whole-document atomic replace.
// Dependencies: patchplane-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Schema documents are read-only from this store's perspective; only values
//! documents are replaced. Each replace serializes the full document with
//! two-space indentation and lands via rename within the storage directory,
//! keeping the replace atomic on the same filesystem.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use patchplane_core::AppName;
use patchplane_core::ConfigStore;
use patchplane_core::StoreError;
use serde_json::Value;
use tempfile::NamedTempFile;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix for schema documents.
const SCHEMA_SUFFIX: &str = ".schema.json";

/// Suffix for values documents.
const VALUES_SUFFIX: &str = ".value.json";

/// Maximum document size accepted on read.
const MAX_DOCUMENT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the filesystem store.
///
/// # Invariants
/// - `dir` must exist and be writable for replaces to succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsStoreConfig {
    /// Directory holding schema and values documents.
    pub dir: PathBuf,
}

// ============================================================================
// SECTION: Store Implementation
// ============================================================================

/// Filesystem-backed configuration store.
///
/// # Invariants
/// - Document paths are always `<dir>/<app><suffix>` with a vetted name.
/// - Replaces are atomic renames within `dir`.
#[derive(Debug, Clone)]
pub struct FsStore {
    /// Store configuration.
    config: FsStoreConfig,
}

impl FsStore {
    /// Creates a store over the given directory.
    #[must_use]
    pub const fn new(config: FsStoreConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the document path for an application and suffix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the name violates the
    /// alphanumeric contract.
    fn document_path(&self, app: &AppName, suffix: &str) -> Result<PathBuf, StoreError> {
        let name = app.as_str();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StoreError::Invalid(format!("invalid application name: {name}")));
        }
        Ok(self.config.dir.join(format!("{name}{suffix}")))
    }
}

impl ConfigStore for FsStore {
    fn schema(&self, app: &AppName) -> Result<Value, StoreError> {
        let path = self.document_path(app, SCHEMA_SUFFIX)?;
        read_document(&path, app)
    }

    fn values(&self, app: &AppName) -> Result<Value, StoreError> {
        let path = self.document_path(app, VALUES_SUFFIX)?;
        read_document(&path, app)
    }

    fn replace_values(&self, app: &AppName, document: &Value) -> Result<(), StoreError> {
        let path = self.document_path(app, VALUES_SUFFIX)?;
        let serialized = serde_json::to_vec_pretty(document)
            .map_err(|err| StoreError::Invalid(format!("document serialization failed: {err}")))?;

        let mut staged = NamedTempFile::new_in(&self.config.dir)
            .map_err(|err| StoreError::Io(format!("staging file creation failed: {err}")))?;
        staged
            .write_all(&serialized)
            .map_err(|err| StoreError::Io(format!("staging write failed: {err}")))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|err| StoreError::Io(format!("staging sync failed: {err}")))?;
        staged
            .persist(&path)
            .map_err(|err| StoreError::Io(format!("atomic replace failed: {err}")))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads and parses one JSON document, failing closed on corruption.
fn read_document(path: &Path, app: &AppName) -> Result<Value, StoreError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return Err(StoreError::NotFound(app.as_str().to_string())),
    };
    if metadata.len() > MAX_DOCUMENT_BYTES {
        return Err(StoreError::Invalid(format!(
            "document exceeds size limit: {}",
            path.display()
        )));
    }
    let bytes = fs::read(path).map_err(|err| StoreError::Io(format!("document read failed: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| StoreError::Invalid(format!("document parse failed: {err}")))
}
