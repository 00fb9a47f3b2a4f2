//! Process specs, lifecycle states and the engine-owned runtime record.

use crate::error::{SchedError, SchedResult};
use crate::time::VirtualTime;

use super::id::ProcessId;

// ── ProcessCategory ───────────────────────────────────────────────────

/// What kind of work a process models. Informational only: no policy
/// looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum ProcessCategory {
    TrafficMonitoring,
    SignalManagement,
    DataAnalysis,
}

impl std::fmt::Display for ProcessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProcessCategory::TrafficMonitoring => "traffic-monitoring",
            ProcessCategory::SignalManagement => "signal-management",
            ProcessCategory::DataAnalysis => "data-analysis",
        };
        f.write_str(label)
    }
}

// ── ProcessState ──────────────────────────────────────────────────────

/// Lifecycle of a process inside one run.
///
/// ```text
/// New ──admit──▶ Ready ──select──▶ Running ──remaining = 0──▶ Terminated
///                  ▲                  │
///                  └───quantum spent──┘  (RoundRobin only)
/// ```
///
/// There is no `Blocked` state: nothing in this model waits on I/O. An
/// I/O-burst extension would add it together with the transitions that
/// produce and leave it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Terminated,
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProcessState::New => "New",
            ProcessState::Ready => "Ready",
            ProcessState::Running => "Running",
            ProcessState::Terminated => "Terminated",
        };
        f.write_str(label)
    }
}

// ── ProcessSpec ───────────────────────────────────────────────────────

/// Caller-supplied description of a workload.
///
/// Times and priority are signed so that out-of-range input can be
/// reported instead of silently wrapping; [`ProcessRecord::from_spec`]
/// does the checking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessSpec {
    pub id: ProcessId,
    pub name: String,
    pub category: ProcessCategory,
    /// Clock value at which the process becomes eligible.
    pub arrival_time: i64,
    /// Total CPU ticks required.
    pub burst_time: i64,
    /// Lower is more urgent.
    pub priority: i64,
    /// Size of the data the process handles, in MB.
    #[cfg_attr(feature = "serialize", serde(default))]
    pub data_size: f64,
}

impl ProcessSpec {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        category: ProcessCategory,
        arrival_time: i64,
        burst_time: i64,
        priority: i64,
        data_size: f64,
    ) -> Self {
        ProcessSpec {
            id: ProcessId::new(id),
            name: name.into(),
            category,
            arrival_time,
            burst_time,
            priority,
            data_size,
        }
    }
}

// ── ProcessRecord ─────────────────────────────────────────────────────

/// A validated process plus the metrics the engine accumulates for it.
///
/// Identity fields are fixed at creation. Runtime fields are written only
/// by the engine; everything outside the crate reads them through
/// accessors on a cloned snapshot. Two records are equal when their ids
/// are equal.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ProcessRecord {
    id: ProcessId,
    name: String,
    category: ProcessCategory,
    arrival: VirtualTime,
    burst: u64,
    priority: i64,
    data_size: f64,

    pub(crate) state: ProcessState,
    pub(crate) remaining: u64,
    pub(crate) waiting: u64,
    pub(crate) start: Option<VirtualTime>,
    pub(crate) finish: Option<VirtualTime>,
    pub(crate) response: Option<u64>,
    pub(crate) turnaround: Option<u64>,
}

impl ProcessRecord {
    /// Validate a spec and build a record in the `New` state.
    pub fn from_spec(spec: &ProcessSpec) -> SchedResult<Self> {
        if spec.name.trim().is_empty() {
            return Err(SchedError::EmptyName(spec.id));
        }
        if spec.arrival_time < 0 {
            return Err(SchedError::InvalidArrival {
                process: spec.id,
                arrival: spec.arrival_time,
            });
        }
        if spec.burst_time <= 0 {
            return Err(SchedError::InvalidBurst {
                process: spec.id,
                burst: spec.burst_time,
            });
        }

        let burst = spec.burst_time as u64;
        Ok(ProcessRecord {
            id: spec.id,
            name: spec.name.clone(),
            category: spec.category,
            arrival: VirtualTime::new(spec.arrival_time as u64),
            burst,
            priority: spec.priority,
            data_size: spec.data_size,
            state: ProcessState::New,
            remaining: burst,
            waiting: 0,
            start: None,
            finish: None,
            response: None,
            turnaround: None,
        })
    }

    /// Put the runtime fields back to their pre-run values.
    pub(crate) fn reset(&mut self) {
        self.state = ProcessState::New;
        self.remaining = self.burst;
        self.waiting = 0;
        self.start = None;
        self.finish = None;
        self.response = None;
        self.turnaround = None;
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ProcessCategory {
        self.category
    }

    pub fn arrival_time(&self) -> VirtualTime {
        self.arrival
    }

    pub fn burst_time(&self) -> u64 {
        self.burst
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Data handled by the process, in MB.
    pub fn data_size(&self) -> f64 {
        self.data_size
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// CPU ticks still owed to this process.
    pub fn remaining_time(&self) -> u64 {
        self.remaining
    }

    /// Ticks spent ready but not running.
    pub fn waiting_time(&self) -> u64 {
        self.waiting
    }

    /// Clock value at first dispatch.
    pub fn start_time(&self) -> Option<VirtualTime> {
        self.start
    }

    /// Clock value at termination.
    pub fn finish_time(&self) -> Option<VirtualTime> {
        self.finish
    }

    /// `start_time − arrival_time`, known from first dispatch onward.
    pub fn response_time(&self) -> Option<u64> {
        self.response
    }

    /// `finish_time − arrival_time`, known once terminated.
    pub fn turnaround_time(&self) -> Option<u64> {
        self.turnaround
    }

    pub fn is_terminated(&self) -> bool {
        self.state == ProcessState::Terminated
    }
}

impl PartialEq for ProcessRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProcessRecord {}

impl std::fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:?} [{}] arrival={} burst={} prio={} remaining={}",
            self.id,
            self.name,
            self.state,
            self.arrival.ticks(),
            self.burst,
            self.priority,
            self.remaining,
        )
    }
}
