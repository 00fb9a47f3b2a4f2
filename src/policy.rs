/// Dispatch policies.
///
/// The policy set is closed, so it is a plain enum with one ordering key
/// per variant rather than a trait object. A policy answers two questions
/// for the engine: in what order pending processes are admitted, and how
/// long a selected process may run.

use std::str::FromStr;

use crate::error::SchedError;
use crate::process::ProcessRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// First-come-first-served: ascending arrival time.
    Fifo,
    /// Non-preemptive shortest-job-first over the full burst.
    Sjf,
    /// Static priority, lower value first.
    Priority,
    /// Preemptive time slicing with a fixed quantum.
    RoundRobin,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Fifo, Policy::Sjf, Policy::Priority, Policy::RoundRobin];

    /// The configuration string that selects this policy.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Sjf => "SJF",
            Policy::Priority => "Priority",
            Policy::RoundRobin => "RoundRobin",
        }
    }

    /// Whether a running process can be sent back to the ready queue
    /// before it finishes.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::RoundRobin)
    }

    /// Indices of `records` in admission order.
    ///
    /// The sort is stable, so equal keys keep their input order. The
    /// order is computed once per run; a process arriving later is not
    /// re-sorted against processes already admitted.
    pub fn admission_order(self, records: &[ProcessRecord]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..records.len()).collect();
        match self {
            Policy::Fifo | Policy::RoundRobin => {
                order.sort_by_key(|&i| records[i].arrival_time())
            }
            Policy::Sjf => order.sort_by_key(|&i| records[i].burst_time()),
            Policy::Priority => order.sort_by_key(|&i| records[i].priority()),
        }
        order
    }

    /// CPU ticks granted to a selected process with `remaining` ticks left.
    ///
    /// Non-preemptive policies behave as an unbounded quantum.
    pub fn slice(self, quantum: u64, remaining: u64) -> u64 {
        match self {
            Policy::RoundRobin => quantum.min(remaining),
            Policy::Fifo | Policy::Sjf | Policy::Priority => remaining,
        }
    }
}

impl FromStr for Policy {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(Policy::Fifo),
            "SJF" => Ok(Policy::Sjf),
            "Priority" => Ok(Policy::Priority),
            "RoundRobin" => Ok(Policy::RoundRobin),
            other => Err(SchedError::UnknownPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessCategory, ProcessSpec};

    fn records(rows: &[(u64, i64, i64, i64)]) -> Vec<ProcessRecord> {
        rows.iter()
            .map(|&(id, arrival, burst, prio)| {
                let spec = ProcessSpec::new(
                    id,
                    format!("p{}", id),
                    ProcessCategory::TrafficMonitoring,
                    arrival,
                    burst,
                    prio,
                    0.0,
                );
                ProcessRecord::from_spec(&spec).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_parse_names() {
        for policy in Policy::ALL {
            assert_eq!(policy.name().parse::<Policy>().unwrap(), policy);
        }
        assert_eq!(
            "Round Robin".parse::<Policy>().unwrap_err(),
            SchedError::UnknownPolicy("Round Robin".into())
        );
        assert!("fifo".parse::<Policy>().is_err());
    }

    #[test]
    fn test_fifo_order_is_stable_on_ties() {
        let recs = records(&[(1, 5, 1, 1), (2, 0, 1, 1), (3, 5, 1, 1), (4, 0, 1, 1)]);
        assert_eq!(Policy::Fifo.admission_order(&recs), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_sjf_and_priority_keys() {
        let recs = records(&[(1, 0, 8, 3), (2, 0, 2, 1), (3, 0, 5, 1), (4, 0, 2, 2)]);
        assert_eq!(Policy::Sjf.admission_order(&recs), vec![1, 3, 2, 0]);
        assert_eq!(Policy::Priority.admission_order(&recs), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_slice() {
        assert_eq!(Policy::RoundRobin.slice(2, 8), 2);
        assert_eq!(Policy::RoundRobin.slice(4, 3), 3);
        assert_eq!(Policy::Fifo.slice(2, 8), 8);
        assert_eq!(Policy::Priority.slice(1, 12), 12);
        assert!(Policy::RoundRobin.is_preemptive());
        assert!(!Policy::Sjf.is_preemptive());
    }
}
