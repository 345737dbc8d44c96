// crates/patchplane-core/src/core/mod.rs
// ============================================================================
// Module: Core Data Model
// Description: Application catalog and change-set types.
// Purpose: Provide the value types shared by the runtime and interfaces.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The core data model covers the closed application catalog and the
//! ephemeral change-set types produced per request. Documents themselves are
//! plain [`serde_json::Value`] trees owned by the configuration store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod changeset;
