/// Fluent builder for workloads and engine setup.
///
/// Hides the boilerplate of writing out `ProcessSpec`s and validating a
/// policy selection, so tests and the command-line driver can describe a
/// run in a few lines.

use crate::config::SimulationConfig;
use crate::engine::{Engine, EngineHandle};
use crate::error::SchedResult;
use crate::policy::Policy;
use crate::process::{ProcessCategory, ProcessSpec};

// ── ScenarioBuilder ───────────────────────────────────────────────────

/// Fluent builder for an [`Engine`] or [`EngineHandle`].
///
/// # Example
/// ```rust
/// use schedsim::dsl::ScenarioBuilder;
///
/// let handle = ScenarioBuilder::new()
///     .round_robin(2)
///     .job(1, 0, 8)
///     .job(2, 2, 5)
///     .build_handle()
///     .unwrap();
/// let outcome = handle.run(|_s: schedsim::Snapshot| {}).unwrap();
/// assert!(outcome.is_completed());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    policy: Policy,
    quantum: Option<i64>,
    processes: Vec<ProcessSpec>,
}

impl ScenarioBuilder {
    /// An empty FIFO scenario.
    pub fn new() -> Self {
        ScenarioBuilder {
            policy: Policy::Fifo,
            quantum: None,
            processes: Vec::new(),
        }
    }

    // ── Policy ────────────────────────────────────────────────

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn fifo(self) -> Self {
        self.policy(Policy::Fifo)
    }

    pub fn sjf(self) -> Self {
        self.policy(Policy::Sjf)
    }

    pub fn priority(self) -> Self {
        self.policy(Policy::Priority)
    }

    pub fn round_robin(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self.policy(Policy::RoundRobin)
    }

    /// Set the quantum without changing the policy.
    pub fn quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    // ── Processes ─────────────────────────────────────────────

    /// Add a fully specified process.
    pub fn process(mut self, spec: ProcessSpec) -> Self {
        self.processes.push(spec);
        self
    }

    /// Add several processes at once.
    pub fn processes(mut self, specs: impl IntoIterator<Item = ProcessSpec>) -> Self {
        self.processes.extend(specs);
        self
    }

    /// Add a process with default name, category, priority and size.
    pub fn job(self, id: u64, arrival: i64, burst: i64) -> Self {
        self.job_with_priority(id, arrival, burst, 1)
    }

    /// Add a process with default name, category and size.
    pub fn job_with_priority(self, id: u64, arrival: i64, burst: i64, priority: i64) -> Self {
        self.process(ProcessSpec::new(
            id,
            format!("job-{}", id),
            ProcessCategory::DataAnalysis,
            arrival,
            burst,
            priority,
            0.0,
        ))
    }

    /// Add the built-in traffic-management workload.
    pub fn sample(self) -> Self {
        self.processes(sample_workload())
    }

    // ── Build ─────────────────────────────────────────────────

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.processes
    }

    pub fn config(&self) -> SchedResult<SimulationConfig> {
        SimulationConfig::with_policy(self.policy, self.quantum)
    }

    /// Validate and build a bare [`Engine`].
    pub fn build(self) -> SchedResult<Engine> {
        let config = self.config()?;
        Engine::new(&self.processes, config)
    }

    /// Validate and build a shareable [`EngineHandle`].
    pub fn build_handle(self) -> SchedResult<EngineHandle> {
        let config = self.config()?;
        EngineHandle::with_config(&self.processes, config)
    }
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Sample workload ───────────────────────────────────────────────────

/// Six processes of a city traffic-management system: area monitoring,
/// traffic-light control and statistics jobs.
pub fn sample_workload() -> Vec<ProcessSpec> {
    use ProcessCategory::*;
    vec![
        ProcessSpec::new(1, "Monitoreo Centro", TrafficMonitoring, 0, 8, 1, 150.0),
        ProcessSpec::new(2, "Semaforos Avenida Principal", SignalManagement, 2, 5, 2, 80.0),
        ProcessSpec::new(3, "Analisis Patrones", DataAnalysis, 4, 12, 3, 300.0),
        ProcessSpec::new(4, "Monitoreo Periferia", TrafficMonitoring, 6, 6, 2, 120.0),
        ProcessSpec::new(5, "Semaforos Interseccion", SignalManagement, 8, 3, 1, 60.0),
        ProcessSpec::new(6, "Reporte Estadisticas", DataAnalysis, 10, 7, 4, 200.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedError;
    use crate::process::ProcessId;

    #[test]
    fn test_builder_defaults_to_fifo() {
        let engine = ScenarioBuilder::new().job(1, 0, 3).build().unwrap();
        assert_eq!(engine.config().policy(), Policy::Fifo);
        assert_eq!(engine.records().len(), 1);
    }

    #[test]
    fn test_builder_round_robin_quantum() {
        let engine = ScenarioBuilder::new().round_robin(3).job(1, 0, 3).build().unwrap();
        assert_eq!(engine.config().quantum(), Some(3));

        let err = ScenarioBuilder::new().round_robin(0).job(1, 0, 3).build().unwrap_err();
        assert_eq!(err, SchedError::InvalidQuantum(0));
    }

    #[test]
    fn test_builder_reports_duplicates() {
        let err = ScenarioBuilder::new().job(1, 0, 3).job(1, 2, 4).build().unwrap_err();
        assert_eq!(err, SchedError::DuplicateId(ProcessId::new(1)));
    }

    #[test]
    fn test_sample_workload_shape() {
        let specs = sample_workload();
        assert_eq!(specs.len(), 6);
        let bursts: Vec<i64> = specs.iter().map(|s| s.burst_time).collect();
        assert_eq!(bursts, vec![8, 5, 12, 6, 3, 7]);
        assert!(specs.windows(2).all(|w| w[0].arrival_time <= w[1].arrival_time));
    }
}
