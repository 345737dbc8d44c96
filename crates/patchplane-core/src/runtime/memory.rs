// crates/patchplane-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Store
// Description: In-memory ConfigStore for tests and embedding.
// Purpose: Provide a deterministic store backend without touching disk.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! `MemoryStore` keeps schema and values documents in a mutex-guarded map.
//! It honors the same contracts as durable backends: reads fail closed on
//! missing applications and replaces are whole-document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::catalog::AppName;
use crate::interfaces::ConfigStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Store
// ============================================================================

/// One application's stored documents.
#[derive(Debug, Clone)]
struct AppDocuments {
    /// Structural schema document.
    schema: Value,
    /// Current values document.
    values: Value,
}

/// In-memory configuration store.
///
/// # Invariants
/// - Reads return deep copies; callers never alias stored documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Documents keyed by application name.
    documents: Mutex<BTreeMap<String, AppDocuments>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an application with a schema and initial values.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store lock is poisoned.
    pub fn seed(&self, app: &AppName, schema: Value, values: Value) -> Result<(), StoreError> {
        let mut guard =
            self.documents.lock().map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        guard.insert(
            app.as_str().to_string(),
            AppDocuments {
                schema,
                values,
            },
        );
        Ok(())
    }
}

impl ConfigStore for MemoryStore {
    fn schema(&self, app: &AppName) -> Result<Value, StoreError> {
        let guard =
            self.documents.lock().map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        guard
            .get(app.as_str())
            .map(|docs| docs.schema.clone())
            .ok_or_else(|| StoreError::NotFound(app.as_str().to_string()))
    }

    fn values(&self, app: &AppName) -> Result<Value, StoreError> {
        let guard =
            self.documents.lock().map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        guard
            .get(app.as_str())
            .map(|docs| docs.values.clone())
            .ok_or_else(|| StoreError::NotFound(app.as_str().to_string()))
    }

    fn replace_values(&self, app: &AppName, document: &Value) -> Result<(), StoreError> {
        let mut guard =
            self.documents.lock().map_err(|_| StoreError::Io("store lock poisoned".to_string()))?;
        let docs = guard
            .get_mut(app.as_str())
            .ok_or_else(|| StoreError::NotFound(app.as_str().to_string()))?;
        docs.values = document.clone();
        Ok(())
    }
}
