use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// MetricsReport
/// Ephemeral, in-memory counters for strategy calls and binding lookups.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetricsReport {
    pub ops: PatchOps,
    pub targets: BTreeMap<String, TargetCounters>,
}

///
/// PatchOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PatchOps {
    // Strategy entrypoints
    pub instance_calls: u64,
    pub patch_calls: u64,
    pub patched_calls: u64,
    pub update_calls: u64,
    pub updated_calls: u64,

    // Outcomes
    pub failures: u64,
    pub input_failures: u64,
    pub slots_applied: u64,

    // Binding cache
    pub binding_hits: u64,
    pub binding_misses: u64,
}

///
/// TargetCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TargetCounters {
    pub calls: u64,
    pub failures: u64,
    pub slots_applied: u64,
}

thread_local! {
    static STATE: RefCell<MetricsReport> = RefCell::new(MetricsReport::default());
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut MetricsReport) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot the counters of the current thread.
#[must_use]
pub fn report() -> MetricsReport {
    STATE.with(|state| state.borrow().clone())
}

/// Reset all counters of the current thread (useful in tests).
pub fn reset() {
    with_state_mut(|state| *state = MetricsReport::default());
}
