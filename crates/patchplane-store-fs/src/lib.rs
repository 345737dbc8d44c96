// crates/patchplane-store-fs/src/lib.rs
// ============================================================================
// Module: Patchplane Filesystem Store
// Description: File-backed schema and values store with atomic replace.
// Purpose: Persist per-application documents as JSON files on disk.
// Dependencies: patchplane-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate implements [`patchplane_core::ConfigStore`] over a flat
//! directory of JSON documents: `<dir>/<app>.schema.json` and
//! `<dir>/<app>.value.json`.
//! Values replacement writes a temporary file in the target directory and
//! atomically renames it over the old document, so readers observe either
//! the old or the new document, never a partial write. Reads fail closed on
//! corrupt JSON.
//!
//! Security posture: application names reaching this crate were vetted by
//! the catalog, but path construction re-checks the alphanumeric contract
//! anyway before touching the filesystem.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::FsStore;
pub use store::FsStoreConfig;
