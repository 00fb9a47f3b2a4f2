//! # schedsim — Deterministic CPU-Scheduling Simulator
//!
//! Runs a fixed set of named processes through one of four dispatch
//! policies (FIFO, SJF, Priority, Round Robin) on a virtual clock and
//! reports waiting, response and turnaround times per process and on
//! average. The same workload can be replayed under every policy to
//! compare them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │      EngineHandle        │ ← busy flag, cancel, worker thread
//! │  ┌────────────────────┐  │
//! │  │      Engine        │  │ ← admission / selection / execution loop
//! │  │  ┌──────────────┐  │  │
//! │  │  │   Policy     │  │  │ ← admission order + slice length
//! │  │  └──────────────┘  │  │
//! │  │  ┌──────────────┐  │  │
//! │  │  │ProcessRecord │  │  │ ← identity + runtime metrics
//! │  │  └──────────────┘  │  │
//! │  │  ┌──────────────┐  │  │
//! │  │  │ VirtualTime  │  │  │ ← logical clock
//! │  │  └──────────────┘  │  │
//! │  └────────────────────┘  │
//! └──────────────────────────┘
//!          │ Snapshot (deep copy, one per step)
//!          ▼
//!      Observer / Metrics
//! ```

#[cfg(feature = "serialize")]
pub mod api;
pub mod config;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod process;
pub mod time;
pub mod trace;

// Re-exports for convenience.
pub use config::SimulationConfig;
#[cfg(feature = "serialize")]
pub use config::Scenario;
pub use engine::{Engine, EngineHandle, Observer, Outcome, Snapshot};
pub use error::{SchedError, SchedResult};
pub use metrics::Metrics;
pub use policy::Policy;
pub use process::{ProcessCategory, ProcessId, ProcessRecord, ProcessSpec, ProcessState};
pub use time::VirtualTime;
pub use trace::{Slice, TraceEntry, TraceKind};
