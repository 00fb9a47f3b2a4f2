//! `EngineHandle` — shareable front end for one configured engine.
//!
//! The handle serializes access to the engine: a busy flag admits one
//! run (or step) at a time, and a cancel flag is polled at the top of
//! every iteration. Each iteration runs under the engine lock, so a
//! reader calling [`EngineHandle::snapshot`] always sees a state between
//! steps, never half of one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use log::warn;

use crate::config::SimulationConfig;
use crate::error::{SchedError, SchedResult};
use crate::metrics::Metrics;
use crate::process::ProcessSpec;

use super::runtime::{Engine, Observer};
use super::snapshot::Snapshot;

// ── Outcome ───────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every process terminated.
    Completed(Metrics),
    /// Stopped by [`EngineHandle::cancel`]; metrics cover what finished.
    Cancelled(Metrics),
    /// An invariant check failed; the engine keeps the state it had.
    Failed(SchedError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            Outcome::Completed(m) | Outcome::Cancelled(m) => Some(m),
            Outcome::Failed(_) => None,
        }
    }
}

// ── EngineHandle ──────────────────────────────────────────────────────

struct Shared {
    engine: Mutex<Engine>,
    busy: AtomicBool,
    cancel: AtomicBool,
}

impl Shared {
    fn lock(&self) -> SchedResult<MutexGuard<'_, Engine>> {
        self.engine
            .lock()
            .map_err(|_| SchedError::InvariantViolation("engine lock poisoned".into()))
    }
}

/// Cloneable, thread-safe handle to an engine.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Arc<Shared>,
}

impl EngineHandle {
    /// Validate the policy selection and the process list, and build an
    /// engine ready to run. Nothing is created on error.
    pub fn configure(
        specs: &[ProcessSpec],
        policy: &str,
        quantum: Option<i64>,
    ) -> SchedResult<Self> {
        let config = SimulationConfig::new(policy, quantum)?;
        Self::with_config(specs, config)
    }

    /// Like [`EngineHandle::configure`] with an already validated config.
    pub fn with_config(specs: &[ProcessSpec], config: SimulationConfig) -> SchedResult<Self> {
        Ok(Self::from_engine(Engine::new(specs, config)?))
    }

    pub fn from_engine(engine: Engine) -> Self {
        EngineHandle {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                busy: AtomicBool::new(false),
                cancel: AtomicBool::new(false),
            }),
        }
    }

    /// Reset and run to completion on the calling thread.
    ///
    /// Fails with [`SchedError::Busy`] if another run or step holds the
    /// engine; every other problem is reported through the [`Outcome`].
    pub fn run<O: Observer>(&self, mut observer: O) -> SchedResult<Outcome> {
        let guard = self.claim()?;
        Ok(guard.drive(&mut observer))
    }

    /// Reset and run to completion on a worker thread.
    ///
    /// The busy flag is taken before the thread starts, so a second start
    /// request fails right away rather than racing this one.
    pub fn spawn<O>(&self, mut observer: O) -> SchedResult<JoinHandle<Outcome>>
    where
        O: Observer + Send + 'static,
    {
        let guard = self.claim()?;
        thread::Builder::new()
            .name("schedsim-run".into())
            .spawn(move || guard.drive(&mut observer))
            .map_err(|e| SchedError::WorkerSpawn(e.to_string()))
    }

    /// Execute one iteration without resetting.
    ///
    /// Returns the resulting snapshot, or `None` once the run is finished.
    pub fn step(&self) -> SchedResult<Option<Snapshot>> {
        let _guard = self.claim()?;
        let mut engine = self.shared.lock()?;
        if engine.step()? {
            Ok(Some(engine.snapshot()))
        } else {
            Ok(None)
        }
    }

    /// Ask an in-progress run to stop before its next iteration.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::SeqCst);
    }

    /// Restore the initial state. Refused while a run is in progress.
    pub fn reset(&self) -> SchedResult<()> {
        let _guard = self.claim()?;
        self.shared.lock()?.reset();
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> SchedResult<Snapshot> {
        Ok(self.shared.lock()?.snapshot())
    }

    pub fn metrics(&self) -> SchedResult<Metrics> {
        Ok(self.shared.lock()?.metrics())
    }

    /// Run `f` with shared access to the engine, e.g. to read its trace.
    pub fn inspect<R>(&self, f: impl FnOnce(&Engine) -> R) -> SchedResult<R> {
        let engine = self.shared.lock()?;
        Ok(f(&*engine))
    }

    fn claim(&self) -> SchedResult<RunGuard> {
        self.shared
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SchedError::Busy)?;
        // Must be cleared before `spawn` returns, not on the worker.
        self.shared.cancel.store(false, Ordering::SeqCst);
        Ok(RunGuard {
            shared: Arc::clone(&self.shared),
        })
    }
}

// ── RunGuard ──────────────────────────────────────────────────────────

/// Holds the busy flag; releases it on drop, panics included.
struct RunGuard {
    shared: Arc<Shared>,
}

impl RunGuard {
    fn drive(&self, observer: &mut dyn Observer) -> Outcome {
        match self.shared.lock() {
            Ok(mut engine) => engine.begin_run(),
            Err(e) => return Outcome::Failed(e),
        }

        loop {
            let snapshot = {
                let mut engine = match self.shared.lock() {
                    Ok(engine) => engine,
                    Err(e) => return Outcome::Failed(e),
                };
                if self.shared.cancel.load(Ordering::SeqCst) {
                    warn!("run cancelled at {}", engine.clock());
                    return Outcome::Cancelled(engine.metrics());
                }
                match engine.step() {
                    Ok(true) => engine.snapshot(),
                    Ok(false) => {
                        engine.end_run();
                        return Outcome::Completed(engine.metrics());
                    }
                    Err(e) => {
                        warn!("run failed at {}: {}", engine.clock(), e);
                        return Outcome::Failed(e);
                    }
                }
            };
            observer.observe(snapshot);
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.shared.busy.store(false, Ordering::SeqCst);
    }
}
