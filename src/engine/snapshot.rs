//! Immutable view of engine state handed to observers.

use crate::metrics::Metrics;
use crate::process::{ProcessId, ProcessRecord};
use crate::time::VirtualTime;

/// A deep copy of the engine state after one iteration.
///
/// Nothing in a snapshot points back into the engine, so an observer
/// may keep it, send it to another thread, or render it while the next
/// step is already running.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Snapshot {
    /// Iterations completed so far in this run.
    pub step: u64,
    pub clock: VirtualTime,
    /// Ready queue, head first.
    pub ready: Vec<ProcessRecord>,
    pub running: Option<ProcessRecord>,
    /// Terminated processes in completion order.
    pub terminated: Vec<ProcessRecord>,
    /// Processes that have not arrived yet, in admission order.
    pub pending: Vec<ProcessRecord>,
    /// Ticks of CPU time handed out so far.
    pub cpu_busy: u64,
}

impl Snapshot {
    /// `true` once nothing is pending, ready or running.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.ready.is_empty() && self.running.is_none()
    }

    pub fn ready_ids(&self) -> Vec<ProcessId> {
        self.ready.iter().map(|p| p.id()).collect()
    }

    pub fn terminated_ids(&self) -> Vec<ProcessId> {
        self.terminated.iter().map(|p| p.id()).collect()
    }

    pub fn running_id(&self) -> Option<ProcessId> {
        self.running.as_ref().map(|p| p.id())
    }

    /// Number of processes in the run.
    pub fn total(&self) -> usize {
        self.pending.len() + self.ready.len() + self.terminated.len() + self.running.iter().count()
    }

    /// Every process, in id order.
    pub fn all_processes(&self) -> Vec<&ProcessRecord> {
        let mut all: Vec<&ProcessRecord> = self
            .pending
            .iter()
            .chain(self.ready.iter())
            .chain(self.running.iter())
            .chain(self.terminated.iter())
            .collect();
        all.sort_by_key(|p| p.id());
        all
    }

    /// Aggregates as of this snapshot.
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(&self.terminated, self.total(), self.clock, self.cpu_busy)
    }
}
