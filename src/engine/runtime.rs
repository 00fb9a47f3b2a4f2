//! `Engine` — the single-threaded step loop.

use std::collections::{HashSet, VecDeque};

use log::{debug, info, trace};

use crate::config::SimulationConfig;
use crate::error::{SchedError, SchedResult};
use crate::metrics::Metrics;
use crate::process::{ProcessRecord, ProcessSpec, ProcessState};
use crate::time::VirtualTime;
use crate::trace::{trace_hash, Slice, TraceEntry, TraceKind};

use super::snapshot::Snapshot;

// ── Observer ──────────────────────────────────────────────────────────

/// Receives one snapshot per completed iteration, in clock order.
pub trait Observer {
    fn observe(&mut self, snapshot: Snapshot);
}

/// An observer backed by a closure.
impl<F> Observer for F
where
    F: FnMut(Snapshot),
{
    fn observe(&mut self, snapshot: Snapshot) {
        (self)(snapshot);
    }
}

// ── Engine ────────────────────────────────────────────────────────────

/// Owns every process record of one configured run and advances the
/// virtual clock.
///
/// Queues hold indices into `records`, which stays in input order for
/// the lifetime of the engine. One call to [`Engine::step`] is one pass
/// of admission, selection, idle jump, execution and completion.
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimulationConfig,
    records: Vec<ProcessRecord>,
    /// Admission order computed once from the policy.
    admission: Vec<usize>,

    pending: Vec<usize>,
    ready: VecDeque<usize>,
    running: Option<usize>,
    terminated: Vec<usize>,

    clock: VirtualTime,
    cpu_busy: u64,
    steps: u64,

    trace: Vec<TraceEntry>,
    timeline: Vec<Slice>,
}

impl Engine {
    /// Validate `specs` and build an engine in its initial state.
    ///
    /// Field errors are reported in input order; a repeated id is
    /// reported at its second occurrence.
    pub fn new(specs: &[ProcessSpec], config: SimulationConfig) -> SchedResult<Self> {
        let mut seen = HashSet::with_capacity(specs.len());
        let mut records = Vec::with_capacity(specs.len());
        for spec in specs {
            let record = ProcessRecord::from_spec(spec)?;
            if !seen.insert(record.id()) {
                return Err(SchedError::DuplicateId(record.id()));
            }
            records.push(record);
        }

        let admission = config.policy().admission_order(&records);
        Ok(Engine {
            config,
            pending: admission.clone(),
            admission,
            records,
            ready: VecDeque::new(),
            running: None,
            terminated: Vec::new(),
            clock: VirtualTime::ZERO,
            cpu_busy: 0,
            steps: 0,
            trace: Vec::new(),
            timeline: Vec::new(),
        })
    }

    /// Return every record to `New` and clear queues, clock and trace.
    pub fn reset(&mut self) {
        for record in &mut self.records {
            record.reset();
        }
        self.pending = self.admission.clone();
        self.ready.clear();
        self.running = None;
        self.terminated.clear();
        self.clock = VirtualTime::ZERO;
        self.cpu_busy = 0;
        self.steps = 0;
        self.trace.clear();
        self.timeline.clear();
    }

    /// `true` when nothing is pending, ready or running.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.ready.is_empty() && self.running.is_none()
    }

    /// Execute one iteration.
    ///
    /// Returns `Ok(false)` without touching state if the run is already
    /// in its terminal configuration.
    pub fn step(&mut self) -> SchedResult<bool> {
        if self.is_finished() {
            return Ok(false);
        }

        self.admit();
        self.select();
        if self.running.is_none() && self.ready.is_empty() {
            self.idle_until_next_arrival()?;
        }
        if let Some(idx) = self.running {
            self.execute(idx)?;
        }

        self.steps += 1;
        Ok(true)
    }

    /// Reset, then step until finished, handing a snapshot to `observer`
    /// after every iteration.
    ///
    /// Returns the number of iterations executed.
    pub fn run(&mut self, observer: &mut dyn Observer) -> SchedResult<u64> {
        self.begin_run();
        while self.step()? {
            observer.observe(self.snapshot());
        }
        self.end_run();
        Ok(self.steps)
    }

    /// Reset and log the start of a run.
    pub(crate) fn begin_run(&mut self) {
        self.reset();
        info!("run start: {} processes, {}", self.records.len(), self.config);
    }

    pub(crate) fn end_run(&self) {
        info!("run finished at {} after {} steps", self.clock, self.steps);
    }

    // ── Step phases ───────────────────────────────────────────

    /// Move every arrived pending record to the ready-queue tail, in
    /// admission order.
    ///
    /// A record admitted after its arrival instant is credited the gap
    /// as waiting time, so waiting time always covers the whole span the
    /// process spent in the system without the CPU.
    fn admit(&mut self) {
        let now = self.clock;
        let pending = std::mem::take(&mut self.pending);
        for idx in pending {
            let record = &mut self.records[idx];
            if record.arrival_time() > now {
                self.pending.push(idx);
                continue;
            }
            record.state = ProcessState::Ready;
            record.waiting += now.since(record.arrival_time()).unwrap_or(0);
            trace!("{} admitted at {}", record.id(), now);
            self.trace.push(TraceEntry {
                time: now,
                process: record.id(),
                kind: TraceKind::Admitted,
            });
            self.ready.push_back(idx);
        }
    }

    fn select(&mut self) {
        if self.running.is_some() {
            return;
        }
        let Some(idx) = self.ready.pop_front() else {
            return;
        };

        let now = self.clock;
        let record = &mut self.records[idx];
        let first = record.start.is_none();
        record.state = ProcessState::Running;
        if first {
            record.start = Some(now);
            record.response = now.since(record.arrival_time());
        }
        debug!("{} dispatched at {} ({} ticks left)", record.id(), now, record.remaining);
        self.trace.push(TraceEntry {
            time: now,
            process: record.id(),
            kind: TraceKind::Dispatched { first },
        });
        self.running = Some(idx);
    }

    /// With the CPU idle and nothing ready, jump the clock to the
    /// earliest pending arrival instead of spinning.
    fn idle_until_next_arrival(&mut self) -> SchedResult<()> {
        let next = self
            .pending
            .iter()
            .copied()
            .min_by_key(|&idx| self.records[idx].arrival_time());
        let Some(idx) = next else {
            return Ok(());
        };

        let arrival = self.records[idx].arrival_time();
        self.clock = self.clock.jump_to(arrival).ok_or_else(|| {
            SchedError::InvariantViolation(format!(
                "next arrival {} is behind the clock {}",
                arrival, self.clock
            ))
        })?;
        trace!("cpu idle, clock jumps to {}", self.clock);
        self.trace.push(TraceEntry {
            time: self.clock,
            process: self.records[idx].id(),
            kind: TraceKind::IdleUntilArrival,
        });
        Ok(())
    }

    fn execute(&mut self, idx: usize) -> SchedResult<()> {
        let remaining = self.records[idx].remaining;
        let slice = self.config.slice_for(remaining);
        if slice == 0 || slice > remaining {
            return Err(SchedError::InvariantViolation(format!(
                "{} granted slice {} with {} ticks left",
                self.records[idx].id(),
                slice,
                remaining
            )));
        }

        let start = self.clock;
        let end = start.advance(slice).ok_or(SchedError::ClockOverflow {
            now: start.ticks(),
            delta: slice,
        })?;

        self.records[idx].remaining = remaining - slice;
        self.clock = end;
        self.cpu_busy += slice;
        for &other in &self.ready {
            self.records[other].waiting += slice;
        }
        self.timeline.push(Slice {
            process: self.records[idx].id(),
            start,
            end,
        });

        if self.records[idx].remaining == 0 {
            self.complete(idx)
        } else if self.config.policy().is_preemptive() {
            self.preempt(idx);
            Ok(())
        } else {
            Err(SchedError::InvariantViolation(format!(
                "{} left with {} ticks under run-to-completion policy {}",
                self.records[idx].id(),
                self.records[idx].remaining,
                self.config.policy()
            )))
        }
    }

    fn complete(&mut self, idx: usize) -> SchedResult<()> {
        let now = self.clock;
        let record = &mut self.records[idx];
        record.state = ProcessState::Terminated;
        record.finish = Some(now);

        let turnaround = now.since(record.arrival_time()).ok_or_else(|| {
            SchedError::InvariantViolation(format!(
                "{} finished at {} before arriving at {}",
                record.id(),
                now,
                record.arrival_time()
            ))
        })?;
        record.turnaround = Some(turnaround);

        if record.response.is_none() {
            return Err(SchedError::InvariantViolation(format!(
                "{} terminated without ever being dispatched",
                record.id()
            )));
        }
        if turnaround != record.waiting + record.burst_time() {
            return Err(SchedError::InvariantViolation(format!(
                "{} turnaround {} != waiting {} + burst {}",
                record.id(),
                turnaround,
                record.waiting,
                record.burst_time()
            )));
        }

        debug!(
            "{} completed at {} (waiting={}, turnaround={})",
            record.id(),
            now,
            record.waiting,
            turnaround
        );
        self.trace.push(TraceEntry {
            time: now,
            process: record.id(),
            kind: TraceKind::Completed,
        });
        self.terminated.push(idx);
        self.running = None;
        Ok(())
    }

    /// Send a Round Robin process back to the queue tail.
    ///
    /// Arrivals up to the current instant are admitted first, so the
    /// preempted process lines up behind everything that is ready now.
    fn preempt(&mut self, idx: usize) {
        self.admit();

        let now = self.clock;
        let record = &mut self.records[idx];
        record.state = ProcessState::Ready;
        debug!("{} preempted at {} ({} ticks left)", record.id(), now, record.remaining);
        self.trace.push(TraceEntry {
            time: now,
            process: record.id(),
            kind: TraceKind::Preempted {
                remaining: record.remaining,
            },
        });
        self.ready.push_back(idx);
        self.running = None;
    }

    // ── Inspection ────────────────────────────────────────────

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let copy = |idx: &usize| self.records[*idx].clone();
        Snapshot {
            step: self.steps,
            clock: self.clock,
            ready: self.ready.iter().map(copy).collect(),
            running: self.running.as_ref().map(copy),
            terminated: self.terminated.iter().map(copy).collect(),
            pending: self.pending.iter().map(copy).collect(),
            cpu_busy: self.cpu_busy,
        }
    }

    pub fn metrics(&self) -> Metrics {
        let terminated: Vec<ProcessRecord> = self
            .terminated
            .iter()
            .map(|&idx| self.records[idx].clone())
            .collect();
        Metrics::compute(&terminated, self.records.len(), self.clock, self.cpu_busy)
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn clock(&self) -> VirtualTime {
        self.clock
    }

    /// Iterations executed since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total CPU ticks handed out since the last reset.
    pub fn cpu_busy(&self) -> u64 {
        self.cpu_busy
    }

    /// All records, in input order.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }

    /// Deterministic hash of this run's trace and timeline.
    pub fn trace_hash(&self) -> u64 {
        trace_hash(&self.trace, &self.timeline)
    }
}
