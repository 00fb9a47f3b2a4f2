//! The scheduling engine.
//!
//! [`Engine`] owns the process records of one configured run and
//! advances a virtual clock one iteration at a time. [`EngineHandle`]
//! wraps it for callers that run on a worker thread, need to cancel, or
//! read state between steps. Observers only ever receive [`Snapshot`]s,
//! which are deep copies.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`runtime`] | [`Engine`] step loop + [`Observer`] trait |
//! | [`handle`] | [`EngineHandle`], [`Outcome`] |
//! | [`snapshot`] | [`Snapshot`] |

pub mod handle;
pub mod runtime;
pub mod snapshot;

pub use handle::{EngineHandle, Outcome};
pub use runtime::{Engine, Observer};
pub use snapshot::Snapshot;
