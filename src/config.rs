//! Run configuration and scenario files.
//!
//! [`SimulationConfig`] is the validated policy/quantum pair the engine
//! runs with. [`Scenario`] is the on-disk form: a JSON document carrying
//! the policy name, an optional quantum and the process list.

use crate::error::{SchedError, SchedResult};
use crate::policy::Policy;
#[cfg(feature = "serialize")]
use crate::process::ProcessSpec;

/// Quantum used when a caller does not pick one.
pub const DEFAULT_QUANTUM: u64 = 2;

/// A validated policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SimulationConfig {
    policy: Policy,
    quantum: Option<u64>,
}

impl SimulationConfig {
    /// Parse a policy name and check the quantum.
    ///
    /// The quantum is required and must be positive for `RoundRobin`;
    /// other policies ignore it.
    pub fn new(policy_name: &str, quantum: Option<i64>) -> SchedResult<Self> {
        let policy: Policy = policy_name.parse()?;
        Self::with_policy(policy, quantum)
    }

    /// Same as [`SimulationConfig::new`] for an already-parsed policy.
    pub fn with_policy(policy: Policy, quantum: Option<i64>) -> SchedResult<Self> {
        let quantum = match policy {
            Policy::RoundRobin => match quantum {
                None => return Err(SchedError::MissingQuantum),
                Some(q) if q <= 0 => return Err(SchedError::InvalidQuantum(q)),
                Some(q) => Some(q as u64),
            },
            Policy::Fifo | Policy::Sjf | Policy::Priority => None,
        };
        Ok(SimulationConfig { policy, quantum })
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// The Round Robin quantum, `None` for run-to-completion policies.
    pub fn quantum(&self) -> Option<u64> {
        self.quantum
    }

    /// Ticks granted to a selected process with `remaining` ticks left.
    pub(crate) fn slice_for(&self, remaining: u64) -> u64 {
        self.policy.slice(self.quantum.unwrap_or(u64::MAX), remaining)
    }
}

impl std::fmt::Display for SimulationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quantum {
            Some(q) => write!(f, "{} (quantum={})", self.policy, q),
            None => write!(f, "{}", self.policy),
        }
    }
}

// ── Scenario ──────────────────────────────────────────────────────────

/// A workload plus policy selection as read from a JSON file.
///
/// ```json
/// {
///   "policy": "RoundRobin",
///   "quantum": 2,
///   "processes": [
///     { "id": 1, "name": "Monitoreo Centro", "category": "traffic-monitoring",
///       "arrival_time": 0, "burst_time": 8, "priority": 1, "data_size": 150 }
///   ]
/// }
/// ```
#[cfg(feature = "serialize")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    #[serde(default = "default_policy_name")]
    pub policy: String,
    #[serde(default)]
    pub quantum: Option<i64>,
    pub processes: Vec<ProcessSpec>,
}

#[cfg(feature = "serialize")]
fn default_policy_name() -> String {
    Policy::Fifo.name().to_string()
}

#[cfg(feature = "serialize")]
impl Scenario {
    /// Parse a scenario from a JSON string.
    pub fn from_json_str(s: &str) -> SchedResult<Self> {
        serde_json::from_str(s).map_err(|e| SchedError::InvalidScenario(e.to_string()))
    }

    /// Read and parse a scenario file.
    pub fn load(path: impl AsRef<std::path::Path>) -> SchedResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SchedError::InvalidScenario(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Validate the policy selection carried by this scenario.
    pub fn config(&self) -> SchedResult<SimulationConfig> {
        SimulationConfig::new(&self.policy, self.quantum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_requires_positive_quantum() {
        assert_eq!(
            SimulationConfig::new("RoundRobin", Some(0)).unwrap_err(),
            SchedError::InvalidQuantum(0)
        );
        assert_eq!(
            SimulationConfig::new("RoundRobin", Some(-3)).unwrap_err(),
            SchedError::InvalidQuantum(-3)
        );
        assert_eq!(
            SimulationConfig::new("RoundRobin", None).unwrap_err(),
            SchedError::MissingQuantum
        );
        let cfg = SimulationConfig::new("RoundRobin", Some(2)).unwrap();
        assert_eq!(cfg.quantum(), Some(2));
        assert_eq!(cfg.slice_for(7), 2);
    }

    #[test]
    fn test_quantum_ignored_for_run_to_completion() {
        let cfg = SimulationConfig::new("SJF", Some(0)).unwrap();
        assert_eq!(cfg.policy(), Policy::Sjf);
        assert_eq!(cfg.quantum(), None);
        assert_eq!(cfg.slice_for(12), 12);
    }

    #[test]
    fn test_unknown_policy() {
        let err = SimulationConfig::new("Lottery", Some(2)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_display() {
        assert_eq!(SimulationConfig::new("FIFO", None).unwrap().to_string(), "FIFO");
        assert_eq!(
            SimulationConfig::new("RoundRobin", Some(3)).unwrap().to_string(),
            "RoundRobin (quantum=3)"
        );
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_scenario_from_json() {
        use crate::process::{ProcessCategory, ProcessId};

        let json = r#"{
            "policy": "RoundRobin",
            "quantum": 4,
            "processes": [
                { "id": 1, "name": "a", "category": "signal-management",
                  "arrival_time": 0, "burst_time": 3, "priority": 2 },
                { "id": 2, "name": "b", "category": "data-analysis",
                  "arrival_time": 1, "burst_time": 9, "priority": 1, "data_size": 12.5 }
            ]
        }"#;
        let scenario = Scenario::from_json_str(json).unwrap();
        assert_eq!(scenario.processes.len(), 2);
        assert_eq!(scenario.processes[0].id, ProcessId::new(1));
        assert_eq!(scenario.processes[0].category, ProcessCategory::SignalManagement);
        assert_eq!(scenario.processes[0].data_size, 0.0);
        assert_eq!(scenario.processes[1].data_size, 12.5);
        assert_eq!(scenario.config().unwrap().quantum(), Some(4));
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_scenario_defaults_to_fifo() {
        let scenario = Scenario::from_json_str(r#"{ "processes": [] }"#).unwrap();
        assert_eq!(scenario.config().unwrap().policy(), Policy::Fifo);
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_scenario_load_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "policy": "Priority", "processes": [
                {{ "id": 9, "name": "x", "category": "traffic-monitoring",
                   "arrival_time": 2, "burst_time": 1, "priority": 5 }} ] }}"#
        )
        .unwrap();

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.policy, "Priority");
        assert_eq!(scenario.processes[0].arrival_time, 2);
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_scenario_errors() {
        assert!(matches!(
            Scenario::from_json_str("{ not json"),
            Err(SchedError::InvalidScenario(_))
        ));
        assert!(matches!(
            Scenario::load("/definitely/not/here.json"),
            Err(SchedError::InvalidScenario(_))
        ));
    }
}
