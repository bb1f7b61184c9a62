// src/hooks/mod.rs
//! Host-facing event plumbing: wire protocol, handlers, and the small
//! pieces of persisted hook state.

pub mod cache;
pub mod handlers;
pub mod protocol;

pub use cache::{sanitize_branch, PlanMarker, ProtectionCache, DEFAULT_TTL_SECS};
pub use protocol::{HookRequest, HookResponse};
