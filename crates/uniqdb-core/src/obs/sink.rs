//! Metrics sink boundary.
//!
//! Core DB logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between execution logic
//! and the global metrics state.
use crate::{obs::metrics, traits::Path};
use std::{cell::RefCell, marker::PhantomData, rc::Rc, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Load,
    Save,
    Delete,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ExecStart {
        kind: ExecKind,
        entity_path: &'static str,
    },
    ExecFinish {
        kind: ExecKind,
        entity_path: &'static str,
        rows_touched: u64,
        micros: u64,
    },
    IdentityLookup {
        entity_path: &'static str,
        matched: bool,
    },
    IdentityAdopted {
        entity_path: &'static str,
    },
    IdentityConflict {
        entity_path: &'static str,
    },
    DuplicateIdentity {
        entity_path: &'static str,
    },
    CountQuery {
        entity_path: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecStart { kind, entity_path } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ExecKind::Load => m.ops.load_calls = m.ops.load_calls.saturating_add(1),
                        ExecKind::Save => m.ops.save_calls = m.ops.save_calls.saturating_add(1),
                        ExecKind::Delete => {
                            m.ops.delete_calls = m.ops.delete_calls.saturating_add(1);
                        }
                    }

                    let entry = m.entity(entity_path);
                    match kind {
                        ExecKind::Load => entry.load_calls = entry.load_calls.saturating_add(1),
                        ExecKind::Save => entry.save_calls = entry.save_calls.saturating_add(1),
                        ExecKind::Delete => {
                            entry.delete_calls = entry.delete_calls.saturating_add(1);
                        }
                    }
                });
            }

            MetricsEvent::ExecFinish {
                kind,
                entity_path,
                rows_touched,
                micros,
            } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ExecKind::Load => {
                            m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.load_micros_total,
                                &mut m.perf.load_micros_max,
                                micros,
                            );
                        }
                        ExecKind::Save => {
                            m.ops.rows_saved = m.ops.rows_saved.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.save_micros_total,
                                &mut m.perf.save_micros_max,
                                micros,
                            );
                        }
                        ExecKind::Delete => {
                            m.ops.rows_deleted = m.ops.rows_deleted.saturating_add(rows_touched);
                            metrics::add_micros(
                                &mut m.perf.delete_micros_total,
                                &mut m.perf.delete_micros_max,
                                micros,
                            );
                        }
                    }

                    let entry = m.entity(entity_path);
                    match kind {
                        ExecKind::Load => {
                            entry.rows_loaded = entry.rows_loaded.saturating_add(rows_touched);
                        }
                        ExecKind::Save => {
                            entry.rows_saved = entry.rows_saved.saturating_add(rows_touched);
                        }
                        ExecKind::Delete => {
                            entry.rows_deleted = entry.rows_deleted.saturating_add(rows_touched);
                        }
                    }
                });
            }

            MetricsEvent::IdentityLookup { matched, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.identity_lookups = m.ops.identity_lookups.saturating_add(1);
                    if matched {
                        m.ops.identity_hits = m.ops.identity_hits.saturating_add(1);
                    }
                });
            }

            MetricsEvent::IdentityAdopted { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.identities_adopted = m.ops.identities_adopted.saturating_add(1);
                });
            }

            MetricsEvent::IdentityConflict { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.identity_conflicts = m.ops.identity_conflicts.saturating_add(1);
                    let entry = m.entity(entity_path);
                    entry.identity_conflicts = entry.identity_conflicts.saturating_add(1);
                });
            }

            MetricsEvent::DuplicateIdentity { entity_path } => {
                metrics::with_state_mut(|m| {
                    m.ops.duplicate_identities = m.ops.duplicate_identities.saturating_add(1);
                    let entry = m.entity(entity_path);
                    entry.duplicate_identities = entry.duplicate_identities.saturating_add(1);
                });
            }

            MetricsEvent::CountQuery { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.count_queries = m.ops.count_queries.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state (counters + perf).
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary, thread-scoped metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

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

/// Span
/// RAII guard that emits start/finish metrics events for one executor call.
/// Ensures finish accounting happens even on unwind.

pub(crate) struct Span<E: Path> {
    kind: ExecKind,
    start: Instant,
    rows: u64,
    _marker: PhantomData<E>,
}

impl<E: Path> Span<E> {
    /// Start a metrics span for a specific entity and executor kind.
    #[must_use]
    pub(crate) fn new(kind: ExecKind) -> Self {
        record(MetricsEvent::ExecStart {
            kind,
            entity_path: E::PATH,
        });

        Self {
            kind,
            start: Instant::now(),
            rows: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl<E: Path> Drop for Span<E> {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::ExecFinish {
            kind: self.kind,
            entity_path: E::PATH,
            rows_touched: self.rows,
            micros,
        });
    }
}
