/// JSON export of finished runs and snapshots.
///
/// A [`Report`] bundles everything a presentation layer needs after a
/// run: the policy, aggregate metrics, every process record, the
/// execution timeline and the replay hash.

use crate::engine::{Engine, Snapshot};
use crate::error::{SchedError, SchedResult};
use crate::metrics::Metrics;
use crate::policy::Policy;
use crate::process::ProcessRecord;
use crate::trace::Slice;

#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub policy: Policy,
    pub quantum: Option<u64>,
    pub metrics: Metrics,
    /// Records in input order.
    pub processes: Vec<ProcessRecord>,
    pub timeline: Vec<Slice>,
    pub trace_hash: u64,
}

impl Report {
    /// Capture the engine's current state; usually called after a run.
    pub fn from_engine(engine: &Engine) -> Self {
        Report {
            policy: engine.config().policy(),
            quantum: engine.config().quantum(),
            metrics: engine.metrics(),
            processes: engine.records().to_vec(),
            timeline: engine.timeline().to_vec(),
            trace_hash: engine.trace_hash(),
        }
    }

    pub fn to_json(&self) -> SchedResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SchedError::SerializationError(e.to_string()))
    }
}

/// Render a snapshot as pretty-printed JSON.
pub fn snapshot_json(snapshot: &Snapshot) -> SchedResult<String> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|e| SchedError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ScenarioBuilder;

    #[test]
    fn test_report_json() {
        let mut engine = ScenarioBuilder::new().round_robin(2).sample().build().unwrap();
        engine.run(&mut |_s: Snapshot| {}).unwrap();

        let report = Report::from_engine(&engine);
        assert_eq!(report.processes.len(), 6);
        assert_eq!(report.quantum, Some(2));

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["policy"], "RoundRobin");
        assert_eq!(value["metrics"]["completed"], 6);
        assert_eq!(value["processes"][0]["category"], "traffic-monitoring");
        assert_eq!(value["processes"][0]["state"], "Terminated");
        assert_eq!(value["timeline"][0]["end"], 2);
    }

    #[test]
    fn test_snapshot_json() {
        let mut engine = ScenarioBuilder::new().job(1, 0, 3).job(2, 1, 2).build().unwrap();
        engine.step().unwrap();
        let json = snapshot_json(&engine.snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["clock"], 3);
        assert_eq!(value["step"], 1);
        assert!(value["running"].is_null());
        assert_eq!(value["terminated"][0]["id"], 1);
    }
}
