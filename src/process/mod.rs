//! Schedulable workloads and their runtime bookkeeping.
//!
//! A [`ProcessSpec`] is the caller's description of one workload. The
//! engine turns each spec into a [`ProcessRecord`] that it owns and
//! mutates for the duration of a run; observers only ever see clones.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`id`] | [`ProcessId`] newtype |
//! | [`record`] | [`ProcessCategory`], [`ProcessState`], [`ProcessSpec`], [`ProcessRecord`] |

pub mod id;
pub mod record;

pub use id::ProcessId;
pub use record::{ProcessCategory, ProcessRecord, ProcessSpec, ProcessState};
