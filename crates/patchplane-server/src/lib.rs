// crates/patchplane-server/src/lib.rs
// ============================================================================
// Module: Patchplane Server
// Description: HTTP surface for free-text configuration requests.
// Purpose: Expose the patch pipeline and document reads over axum routes.
// Dependencies: axum, patchplane-core, patchplane-oracle, patchplane-store-fs, serde, tokio
// ============================================================================

//! ## Overview
//! The server wires the patch pipeline to an HTTP surface: `POST /message`
//! drives one request end to end, `GET /schemas/{app}` and
//! `GET /values/{app}` expose the stored documents read-only, and
//! `/health` / `/ready` serve probes. Pipeline work is blocking (oracle and
//! store calls) and runs on the blocking pool, off the async runtime.
//!
//! Security posture: request text is untrusted operator input and is passed
//! to the oracle verbatim; all safety decisions happen in the core pipeline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod routes;
pub mod telemetry;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use routes::AppState;
pub use routes::router;
pub use routes::status_for;
pub use telemetry::MetricsSink;
pub use telemetry::NoopMetrics;
pub use telemetry::RequestOutcome;
