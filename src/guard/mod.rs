// src/guard/mod.rs
//! Gatekeepers: the runtime import guard and the pre-write guard.

pub mod prewrite;
pub mod runtime;

pub use runtime::{run_static_pass, ImportObserver, ObserveOutcome, RuntimeGuard};
