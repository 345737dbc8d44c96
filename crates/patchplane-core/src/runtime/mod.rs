// crates/patchplane-core/src/runtime/mod.rs
// ============================================================================
// Module: Patchplane Runtime
// Description: Identification, filtering, patch application, and orchestration.
// Purpose: Wire the core model and interfaces into the per-request pipeline.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime owns the deterministic half of request handling: resolving an
//! application name, filtering untrusted edits, applying survivors to a
//! private copy, validating against the schema, and persisting the result
//! all-or-nothing through the injected store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod filters;
pub mod identify;
pub mod memory;
pub mod pipeline;
