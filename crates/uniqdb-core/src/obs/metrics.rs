use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

///
/// EventState
/// Ephemeral, in-memory counters and simple perf totals for operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) perf: EventPerf,
    pub(crate) entities: BTreeMap<String, EntityCounters>,
}

impl EventState {
    const fn new() -> Self {
        Self {
            ops: EventOps::new(),
            perf: EventPerf::new(),
            entities: BTreeMap::new(),
        }
    }

    pub(crate) fn entity(&mut self, path: &str) -> &mut EntityCounters {
        self.entities.entry(path.to_string()).or_default()
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Executor entrypoints
    pub load_calls: u64,
    pub save_calls: u64,
    pub delete_calls: u64,

    // Rows touched
    pub rows_loaded: u64,
    pub rows_saved: u64,
    pub rows_deleted: u64,

    // Secondary identity
    pub identity_lookups: u64,
    pub identity_hits: u64,
    pub identities_adopted: u64,
    pub identity_conflicts: u64,
    pub duplicate_identities: u64,

    // Pagination
    pub count_queries: u64,
}

impl EventOps {
    const fn new() -> Self {
        Self {
            load_calls: 0,
            save_calls: 0,
            delete_calls: 0,
            rows_loaded: 0,
            rows_saved: 0,
            rows_deleted: 0,
            identity_lookups: 0,
            identity_hits: 0,
            identities_adopted: 0,
            identity_conflicts: 0,
            duplicate_identities: 0,
            count_queries: 0,
        }
    }
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub load_calls: u64,
    pub save_calls: u64,
    pub delete_calls: u64,
    pub rows_loaded: u64,
    pub rows_saved: u64,
    pub rows_deleted: u64,
    pub identity_conflicts: u64,
    pub duplicate_identities: u64,
}

///
/// EventPerf
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventPerf {
    // Wall-clock totals per executor, in microseconds
    pub load_micros_total: u128,
    pub save_micros_total: u128,
    pub delete_micros_total: u128,

    // Maximum observed durations
    pub load_micros_max: u64,
    pub save_micros_max: u64,
    pub delete_micros_max: u64,
}

impl EventPerf {
    const fn new() -> Self {
        Self {
            load_micros_total: 0,
            save_micros_total: 0,
            delete_micros_total: 0,
            load_micros_max: 0,
            save_micros_max: 0,
            delete_micros_max: 0,
        }
    }
}

///
/// EventReport
/// Point-in-time copy of the metrics state.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub perf: EventPerf,
    pub entities: BTreeMap<String, EntityCounters>,
}

static EVENT_STATE: Mutex<EventState> = Mutex::new(EventState::new());

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut state)
}

/// Snapshot the current state.
pub(crate) fn report() -> EventReport {
    with_state_mut(|m| EventReport {
        ops: m.ops.clone(),
        perf: m.perf.clone(),
        entities: m.entities.clone(),
    })
}

/// Reset all event state: counters and perf.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::new());
}

/// Accumulate a duration and track a max.
pub(crate) fn add_micros(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}
