// crates/patchplane-core/src/lib.rs
// ============================================================================
// Module: Patchplane Core
// Description: Patch synthesis, safety filtering, and validation pipeline.
// Purpose: Turn untrusted change proposals into schema-valid configuration.
// Dependencies: jsonschema, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Patchplane core translates oracle-proposed configuration edits into
//! validated, persistable values documents. The crate owns the closed
//! application catalog, the safety filter chain, the patch engine, and the
//! request pipeline that ties them to injected oracle and store backends.
//! All mutation happens on private copies; a stored document is replaced only
//! after the merged result passes schema validation.
//!
//! Security posture: oracle output is untrusted and may invent paths, types,
//! or whole subtrees; every edit passes the filter chain and the merged
//! document passes structural validation before persistence.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::catalog::AppCatalog;
pub use crate::core::catalog::AppName;
pub use crate::core::catalog::CatalogError;
pub use crate::core::changeset::ChangeSetError;
pub use crate::core::changeset::Edit;
pub use crate::core::changeset::ParsedChangeSet;
pub use crate::core::changeset::extract_array_span;
pub use crate::core::changeset::parse_change_set;
pub use interfaces::ChangeOracle;
pub use interfaces::ConfigStore;
pub use interfaces::OracleError;
pub use interfaces::StoreError;
pub use runtime::engine::PatchError;
pub use runtime::engine::PatchOutcome;
pub use runtime::engine::apply_change_set;
pub use runtime::filters::DroppedEdit;
pub use runtime::filters::FilterOutcome;
pub use runtime::filters::filter_change_set;
pub use runtime::identify::IdentifyError;
pub use runtime::identify::identify;
pub use runtime::memory::MemoryStore;
pub use runtime::pipeline::PatchPipeline;
pub use runtime::pipeline::PipelineOutcome;
pub use runtime::pipeline::RequestError;
