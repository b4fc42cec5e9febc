//! Observability sink boundary.
//!
//! Engine logic MUST NOT touch `obs::metrics` directly.
//! All instrumentation flows through `PatchEvent` and `PatchSink`.

use crate::{binding::BindingKind, document::Strategy, error::PatchError, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn PatchSink>>> = const { RefCell::new(None) };
}

///
/// PatchEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatchEvent {
    ApplyStart {
        strategy: Strategy,
        target: &'static str,
    },
    ApplyFinish {
        strategy: Strategy,
        target: &'static str,
        slots_present: u64,
        slots_total: u64,
    },
    ApplyFailed {
        strategy: Strategy,
        target: &'static str,
        error: PatchError,
    },
    BindingResolved {
        target: &'static str,
        kind: BindingKind,
        cached: bool,
    },
}

///
/// PatchSink
///

pub trait PatchSink {
    fn record(&self, event: &PatchEvent);
}

/// GlobalPatchSink
/// Default sink: per-thread counters plus structured `tracing` events.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalPatchSink;

impl PatchSink for GlobalPatchSink {
    fn record(&self, event: &PatchEvent) {
        match event {
            PatchEvent::ApplyStart { strategy, target } => {
                tracing::trace!(strategy = %strategy, record = target, "patch strategy started");

                metrics::with_state_mut(|m| {
                    let calls = match strategy {
                        Strategy::Instance => &mut m.ops.instance_calls,
                        Strategy::Patch => &mut m.ops.patch_calls,
                        Strategy::Patched => &mut m.ops.patched_calls,
                        Strategy::Update => &mut m.ops.update_calls,
                        Strategy::Updated => &mut m.ops.updated_calls,
                    };
                    *calls = calls.saturating_add(1);

                    let entry = m.targets.entry((*target).to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            PatchEvent::ApplyFinish {
                strategy,
                target,
                slots_present,
                slots_total,
            } => {
                tracing::trace!(
                    strategy = %strategy,
                    record = target,
                    slots_present,
                    slots_total,
                    "patch strategy applied"
                );

                metrics::with_state_mut(|m| {
                    m.ops.slots_applied = m.ops.slots_applied.saturating_add(*slots_present);

                    let entry = m.targets.entry((*target).to_string()).or_default();
                    entry.slots_applied = entry.slots_applied.saturating_add(*slots_present);
                });
            }

            PatchEvent::ApplyFailed {
                strategy,
                target,
                error,
            } => {
                tracing::debug!(
                    strategy = %strategy,
                    record = target,
                    class = %error.class(),
                    error = %error,
                    "patch strategy failed"
                );

                metrics::with_state_mut(|m| {
                    m.ops.failures = m.ops.failures.saturating_add(1);
                    if error.is_input() {
                        m.ops.input_failures = m.ops.input_failures.saturating_add(1);
                    }

                    let entry = m.targets.entry((*target).to_string()).or_default();
                    entry.failures = entry.failures.saturating_add(1);
                });
            }

            PatchEvent::BindingResolved {
                target,
                kind,
                cached,
            } => {
                tracing::trace!(record = target, kind = %kind, cached, "record binding resolved");

                metrics::with_state_mut(|m| {
                    if *cached {
                        m.ops.binding_hits = m.ops.binding_hits.saturating_add(1);
                    } else {
                        m.ops.binding_misses = m.ops.binding_misses.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) fn record(event: PatchEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(&event),
        None => GlobalPatchSink.record(&event),
    }
}

/// Run a closure with a temporary sink override for the current thread.
/// The previous sink is restored on every exit, including unwinding.
pub fn with_patch_sink<R>(sink: Rc<dyn PatchSink>, f: impl FnOnce() -> R) -> R {
    struct Guard(Option<Rc<dyn PatchSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
