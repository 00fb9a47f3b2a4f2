//! Aggregate timing metrics over terminated processes.
//!
//! "Turnaround" is always `finish − arrival` and "response" is always
//! `first start − arrival`. Averages are taken over terminated processes
//! only and are zero when nothing has terminated yet.

use crate::process::ProcessRecord;
use crate::time::VirtualTime;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Processes that have terminated.
    pub completed: usize,
    /// Processes in the run, terminated or not.
    pub total: usize,
    pub average_waiting: f64,
    pub average_turnaround: f64,
    pub average_response: f64,
    /// Clock value at the time of measurement.
    pub elapsed: u64,
    /// Ticks the CPU spent running a process.
    pub cpu_busy: u64,
    /// `cpu_busy / elapsed`, 0 when no time has passed.
    pub utilization: f64,
}

impl Metrics {
    /// Read-only aggregation; never touches engine state.
    pub fn compute(
        terminated: &[ProcessRecord],
        total: usize,
        clock: VirtualTime,
        cpu_busy: u64,
    ) -> Self {
        let completed = terminated.len();
        let elapsed = clock.ticks();
        let utilization = if elapsed == 0 {
            0.0
        } else {
            cpu_busy as f64 / elapsed as f64
        };

        if completed == 0 {
            return Metrics {
                total,
                elapsed,
                cpu_busy,
                utilization,
                ..Metrics::default()
            };
        }

        let n = completed as f64;
        // Per-process values fit in u64, their sums may not.
        let waiting: u128 = terminated.iter().map(|p| u128::from(p.waiting_time())).sum();
        let turnaround: u128 = terminated
            .iter()
            .filter_map(|p| p.turnaround_time())
            .map(u128::from)
            .sum();
        let response: u128 = terminated
            .iter()
            .filter_map(|p| p.response_time())
            .map(u128::from)
            .sum();

        Metrics {
            completed,
            total,
            average_waiting: waiting as f64 / n,
            average_turnaround: turnaround as f64 / n,
            average_response: response as f64 / n,
            elapsed,
            cpu_busy,
            utilization,
        }
    }

    /// Throughput in processes per tick.
    pub fn throughput(&self) -> f64 {
        if self.elapsed == 0 {
            0.0
        } else {
            self.completed as f64 / self.elapsed as f64
        }
    }
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "completed:          {}/{}", self.completed, self.total)?;
        writeln!(f, "average waiting:    {:.2}", self.average_waiting)?;
        writeln!(f, "average turnaround: {:.2}", self.average_turnaround)?;
        writeln!(f, "average response:   {:.2}", self.average_response)?;
        writeln!(f, "elapsed:            {}", self.elapsed)?;
        write!(f, "cpu utilization:    {:.1}%", self.utilization * 100.0)
    }
}
