//! Observability: per-thread counters and sink abstractions.
//!
//! Documents report strategy calls and binding lookups as `PatchEvent`s;
//! nothing outside this module reads or writes the counters.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{MetricsReport, PatchOps, TargetCounters};
pub use sink::{PatchEvent, PatchSink, with_patch_sink};

/// Snapshot the counters of the current thread.
#[must_use]
pub fn metrics_report() -> MetricsReport {
    metrics::report()
}

/// Reset the counters of the current thread.
pub fn metrics_reset() {
    metrics::reset();
}

///
/// TESTS
///
