use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};

/// Process counters, exported under `/debug/vars`.
#[derive(Default, Debug)]
pub struct Stats {
    clients:   AtomicI64,
    msgs_drop: AtomicI64,
    msgs_in:   AtomicI64,
    msgs_out:  AtomicI64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSnapshot {
    pub clients:   i64,
    pub msgs_drop: i64,
    pub msgs_in:   i64,
    pub msgs_out:  i64,
}

impl Stats {
    pub fn set_clients(&self, n: usize) {
        self.clients.store(i64::try_from(n).unwrap_or(i64::MAX), Ordering::Relaxed);
    }
    pub fn add_drop(&self) { self.msgs_drop.fetch_add(1, Ordering::Relaxed); }
    pub fn add_in(&self)   { self.msgs_in.fetch_add(1, Ordering::Relaxed); }
    pub fn add_out(&self)  { self.msgs_out.fetch_add(1, Ordering::Relaxed); }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            clients:   self.clients.load(Ordering::Relaxed),
            msgs_drop: self.msgs_drop.load(Ordering::Relaxed),
            msgs_in:   self.msgs_in.load(Ordering::Relaxed),
            msgs_out:  self.msgs_out.load(Ordering::Relaxed),
        }
    }
}
