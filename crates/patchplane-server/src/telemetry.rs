// crates/patchplane-server/src/telemetry.rs
// ============================================================================
// Module: Server Telemetry
// Description: Observability hooks for request outcomes and dropped edits.
// Purpose: Provide metric events without hard observability dependencies.
// Dependencies: none beyond std
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for request outcome counters
//! and dropped-edit counters. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Security posture: labels are stable category names, never raw request
//! text, so telemetry cannot leak operator input.

// ============================================================================
// SECTION: Metric Events
// ============================================================================

/// One completed request, labeled by outcome category.
///
/// # Invariants
/// - `category` is a stable label (`ok` or a [`patchplane_core::RequestError`]
///   category), never free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// Stable outcome category label.
    pub category: &'static str,
    /// Edits dropped by the safety filter chain during the request.
    pub dropped_edits: usize,
    /// Oracle reply entries dropped as malformed during the request.
    pub malformed_entries: usize,
}

// ============================================================================
// SECTION: Sink Interface
// ============================================================================

/// Metrics sink for request telemetry.
pub trait MetricsSink {
    /// Records one completed request.
    fn record_request(&self, outcome: RequestOutcome);
}

/// Metrics sink that drops all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_request(&self, _outcome: RequestOutcome) {}
}
