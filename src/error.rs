//! Structured error types for the scheduling simulator.
//!
//! All fallible public APIs return `Result<T, SchedError>`. Configuration
//! and validation errors are raised before any engine state exists; a
//! run that detects an inconsistency stops and reports it instead of
//! carrying on.

use crate::process::ProcessId;

/// The top-level error type for the scheduling simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedError {
    // ── Configuration errors ──────────────────────────────

    /// The policy name is not one of `FIFO`, `SJF`, `Priority`, `RoundRobin`.
    UnknownPolicy(String),

    /// Round Robin was selected without a quantum.
    MissingQuantum,

    /// Round Robin was selected with a quantum ≤ 0.
    InvalidQuantum(i64),

    /// A process spec asks for zero or negative CPU time.
    InvalidBurst { process: ProcessId, burst: i64 },

    /// A process spec arrives before time zero.
    InvalidArrival { process: ProcessId, arrival: i64 },

    /// A process spec has an empty display name.
    EmptyName(ProcessId),

    // ── Validation errors ─────────────────────────────────

    /// Two process specs share the same id.
    DuplicateId(ProcessId),

    // ── Run errors ────────────────────────────────────────

    /// A run was requested while another run on the same engine is in
    /// progress.
    Busy,

    /// The virtual clock would overflow `u64`.
    ClockOverflow { now: u64, delta: u64 },

    /// The engine detected an inconsistent internal state.
    InvariantViolation(String),

    /// The worker thread for a background run could not be started.
    WorkerSpawn(String),

    // ── Input errors ──────────────────────────────────────

    /// A scenario document could not be read or parsed.
    InvalidScenario(String),

    /// A report or snapshot could not be rendered as JSON.
    SerializationError(String),
}

impl SchedError {
    /// Errors rejected by `configure` because a setting or spec field is
    /// out of range.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SchedError::UnknownPolicy(_)
                | SchedError::MissingQuantum
                | SchedError::InvalidQuantum(_)
                | SchedError::InvalidBurst { .. }
                | SchedError::InvalidArrival { .. }
                | SchedError::EmptyName(_)
        )
    }

    /// Errors rejected by `configure` because the spec list as a whole is
    /// inconsistent.
    pub fn is_validation(&self) -> bool {
        matches!(self, SchedError::DuplicateId(_))
    }
}

impl std::fmt::Display for SchedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedError::UnknownPolicy(name) => write!(
                f,
                "unknown scheduling policy {:?} (expected FIFO, SJF, Priority or RoundRobin)",
                name
            ),
            SchedError::MissingQuantum => write!(f, "RoundRobin requires a quantum"),
            SchedError::InvalidQuantum(q) => {
                write!(f, "quantum must be greater than zero, got {}", q)
            }
            SchedError::InvalidBurst { process, burst } => {
                write!(f, "process {} has non-positive burst time {}", process, burst)
            }
            SchedError::InvalidArrival { process, arrival } => {
                write!(f, "process {} has negative arrival time {}", process, arrival)
            }
            SchedError::EmptyName(id) => write!(f, "process {} has an empty name", id),
            SchedError::DuplicateId(id) => write!(f, "process id {} appears more than once", id),
            SchedError::Busy => write!(f, "a run is already in progress on this engine"),
            SchedError::ClockOverflow { now, delta } => write!(
                f,
                "virtual clock overflow advancing T={} by {}",
                now, delta
            ),
            SchedError::InvariantViolation(msg) => write!(f, "invariant violated: {}", msg),
            SchedError::WorkerSpawn(msg) => write!(f, "cannot start worker thread: {}", msg),
            SchedError::InvalidScenario(msg) => write!(f, "invalid scenario: {}", msg),
            SchedError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SchedError {}

/// Convenience alias for `Result<T, SchedError>`.
pub type SchedResult<T> = Result<T, SchedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_policy() {
        let e = SchedError::UnknownPolicy("LIFO".into());
        assert!(e.to_string().contains("\"LIFO\""));
    }

    #[test]
    fn test_error_display_burst() {
        let e = SchedError::InvalidBurst { process: ProcessId::new(3), burst: 0 };
        assert_eq!(e.to_string(), "process P3 has non-positive burst time 0");
    }

    #[test]
    fn test_error_classification() {
        assert!(SchedError::InvalidQuantum(0).is_configuration());
        assert!(SchedError::MissingQuantum.is_configuration());
        assert!(!SchedError::Busy.is_configuration());
        assert!(SchedError::DuplicateId(ProcessId::new(1)).is_validation());
        assert!(!SchedError::DuplicateId(ProcessId::new(1)).is_configuration());
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(SchedError::Busy);
        assert!(!e.to_string().is_empty());
    }
}
