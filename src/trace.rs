//! Run trace and execution timeline.
//!
//! The engine appends a [`TraceEntry`] for every lifecycle transition and
//! a [`Slice`] for every stretch of CPU time it hands out. Both are reset
//! with the engine, so two runs of the same workload can be compared via
//! [`trace_hash`].

use crate::process::ProcessId;
use crate::time::VirtualTime;

// ── Hash utility ──────────────────────────────────────────────────────

/// Combine two u64 hashes deterministically.
pub fn hash_combine(a: u64, b: u64) -> u64 {
    let mut h = a;
    h = h.wrapping_mul(0x517cc1b727220a95);
    h = h.wrapping_add(b);
    h ^= h >> 32;
    h
}

// ── TraceEntry ────────────────────────────────────────────────────────

/// What happened to a process at a point in virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceKind {
    /// Moved from the pending set to the ready queue.
    Admitted,
    /// Selected to run. `first` is set on the process's first dispatch.
    Dispatched { first: bool },
    /// Quantum used up with work left; back to the ready queue tail.
    Preempted { remaining: u64 },
    /// Remaining time reached zero.
    Completed,
    /// CPU idle; clock jumped forward to this process's arrival.
    IdleUntilArrival,
}

impl TraceKind {
    fn tag(self) -> u64 {
        match self {
            TraceKind::Admitted => 1,
            TraceKind::Dispatched { first } => hash_combine(2, first as u64),
            TraceKind::Preempted { remaining } => hash_combine(3, remaining),
            TraceKind::Completed => 4,
            TraceKind::IdleUntilArrival => 5,
        }
    }
}

/// A single lifecycle event in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    pub time: VirtualTime,
    pub process: ProcessId,
    pub kind: TraceKind,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} ", self.time, self.process)?;
        match self.kind {
            TraceKind::Admitted => write!(f, "admitted"),
            TraceKind::Dispatched { first: true } => write!(f, "dispatched (first run)"),
            TraceKind::Dispatched { first: false } => write!(f, "dispatched"),
            TraceKind::Preempted { remaining } => {
                write!(f, "preempted, {} ticks left", remaining)
            }
            TraceKind::Completed => write!(f, "completed"),
            TraceKind::IdleUntilArrival => write!(f, "cpu idle until arrival"),
        }
    }
}

// ── Slice ─────────────────────────────────────────────────────────────

/// A contiguous stretch of CPU time given to one process: one bar of a
/// Gantt chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    pub process: ProcessId,
    pub start: VirtualTime,
    pub end: VirtualTime,
}

impl Slice {
    pub fn len(&self) -> u64 {
        self.end.ticks() - self.start.ticks()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Render a timeline as a one-line Gantt chart, e.g.
/// `|0 P1 8|8 P2 13|`.
pub fn gantt(timeline: &[Slice]) -> String {
    let mut s = String::from("|");
    for slice in timeline {
        s.push_str(&format!(
            "{} {} {}|",
            slice.start.ticks(),
            slice.process,
            slice.end.ticks()
        ));
    }
    s
}

/// Deterministic hash over a trace and its timeline.
pub fn trace_hash(trace: &[TraceEntry], timeline: &[Slice]) -> u64 {
    let mut h: u64 = 0;
    for entry in trace {
        h = hash_combine(h, entry.time.ticks());
        h = hash_combine(h, entry.process.raw());
        h = hash_combine(h, entry.kind.tag());
    }
    for slice in timeline {
        h = hash_combine(h, slice.process.raw());
        h = hash_combine(h, slice.start.ticks());
        h = hash_combine(h, slice.end.ticks());
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(id: u64, start: u64, end: u64) -> Slice {
        Slice {
            process: ProcessId::new(id),
            start: VirtualTime::new(start),
            end: VirtualTime::new(end),
        }
    }

    #[test]
    fn test_slice_len() {
        assert_eq!(slice(1, 8, 13).len(), 5);
        assert!(slice(1, 3, 3).is_empty());
    }

    #[test]
    fn test_gantt() {
        assert_eq!(gantt(&[]), "|");
        assert_eq!(gantt(&[slice(1, 0, 2), slice(2, 2, 4)]), "|0 P1 2|2 P2 4|");
    }

    #[test]
    fn test_hash_distinguishes_order() {
        let a = [slice(1, 0, 2), slice(2, 2, 4)];
        let b = [slice(2, 0, 2), slice(1, 2, 4)];
        assert_eq!(trace_hash(&[], &a), trace_hash(&[], &a));
        assert_ne!(trace_hash(&[], &a), trace_hash(&[], &b));
    }

    #[test]
    fn test_hash_sees_kind() {
        let entry = |kind| TraceEntry {
            time: VirtualTime::new(2),
            process: ProcessId::new(1),
            kind,
        };
        assert_ne!(
            trace_hash(&[entry(TraceKind::Preempted { remaining: 6 })], &[]),
            trace_hash(&[entry(TraceKind::Preempted { remaining: 5 })], &[])
        );
    }

    #[test]
    fn test_entry_display() {
        let e = TraceEntry {
            time: VirtualTime::new(2),
            process: ProcessId::new(1),
            kind: TraceKind::Preempted { remaining: 6 },
        };
        assert_eq!(e.to_string(), "[T=2] P1 preempted, 6 ticks left");
    }
}
