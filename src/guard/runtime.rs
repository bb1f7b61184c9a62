// src/guard/runtime.rs
//! The runtime import guard.
//!
//! Rust offers no loader callback to hook, so the shipped driver is a
//! static pass that replays analyzer edges through the observer; the
//! observable behaviour is the same set of violations. The guard is a
//! process-wide singleton: repeated enables never stack, and the
//! violation log survives re-enabling.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::error::ArchError;
use crate::graph::DependencyReport;
use crate::layers::{check_edge, LayerTable};
use crate::types::{Severity, Violation, ViolationKind};

/// Upper bound on retained violation records; oldest are dropped first
/// and a truncation sentinel is raised.
const MAX_LOG: usize = 1024;

/// The observer's vote on one import. The observer never loads
/// modules itself.
#[derive(Debug)]
pub enum ObserveOutcome {
    /// No rule applies; the import proceeds.
    Allowed,
    /// A violation was recorded; the import still proceeds (non-strict).
    Logged,
    /// Strict mode: the import must fail with the carried error.
    Blocked(ArchError),
    /// The importer could not be attributed to a layer; no vote.
    Abstained,
}

impl ObserveOutcome {
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Observes imports as they occur and votes on each.
pub trait ImportObserver: Send + Sync {
    fn observe(&self, importer: &str, target: &str) -> ObserveOutcome;
}

struct GuardState {
    table: LayerTable,
    strict: bool,
    log: VecDeque<Violation>,
    truncated: bool,
}

static GUARD: OnceLock<Mutex<Option<GuardState>>> = OnceLock::new();

fn cell() -> &'static Mutex<Option<GuardState>> {
    GUARD.get_or_init(|| Mutex::new(None))
}

fn lock() -> std::sync::MutexGuard<'static, Option<GuardState>> {
    cell().lock().unwrap_or_else(PoisonError::into_inner)
}

/// The process-global import guard.
pub struct RuntimeGuard;

impl RuntimeGuard {
    /// Installs the guard. Idempotent: a second enable replaces the
    /// layer table and strictness but keeps the violation log.
    pub fn enable(table: LayerTable, strict: bool) {
        let mut slot = lock();
        if let Some(state) = slot.as_mut() {
            state.table = table;
            state.strict = strict;
            return;
        }
        *slot = Some(GuardState {
            table,
            strict,
            log: VecDeque::new(),
            truncated: false,
        });
    }

    /// Removes the guard and its log. Idempotent.
    pub fn disable() {
        *lock() = None;
    }

    #[must_use]
    pub fn is_enabled() -> bool {
        lock().is_some()
    }

    /// Read-returns-copy accessor for the violation log.
    #[must_use]
    pub fn violations() -> Vec<Violation> {
        lock()
            .as_ref()
            .map(|state| state.log.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether the log overflowed and dropped its oldest records.
    #[must_use]
    pub fn truncated() -> bool {
        lock().as_ref().is_some_and(|state| state.truncated)
    }
}

impl ImportObserver for RuntimeGuard {
    fn observe(&self, importer: &str, target: &str) -> ObserveOutcome {
        let mut slot = lock();
        let Some(state) = slot.as_mut() else {
            return ObserveOutcome::Allowed;
        };

        // Synthetic or bootstrap callers have no layer; abstain.
        let Some(layer) = state.table.classify(Path::new(importer)) else {
            return ObserveOutcome::Abstained;
        };

        let Some(violation) = check_edge(&state.table, layer, target, false) else {
            return ObserveOutcome::Allowed;
        };
        if violation.severity != Severity::Error {
            return ObserveOutcome::Allowed;
        }

        let source_tier = violation.source_tier.unwrap_or(0);
        let target_tier = violation.target_tier.unwrap_or(0);

        let record = Violation {
            kind: ViolationKind::Runtime,
            source: importer.to_string(),
            ..violation
        };
        push_record(state, record);

        if state.strict {
            ObserveOutcome::Blocked(ArchError::ImportBlocked {
                source_module: importer.to_string(),
                source_tier,
                target_module: target.to_string(),
                target_tier,
            })
        } else {
            ObserveOutcome::Logged
        }
    }
}

fn push_record(state: &mut GuardState, record: Violation) {
    if state.log.len() >= MAX_LOG {
        state.log.pop_front();
        state.truncated = true;
    }
    state.log.push_back(record);
}

/// Replays every analyzed edge through the guard in deterministic
/// order. Returns the number of imports the guard voted against.
#[must_use]
pub fn run_static_pass(report: &DependencyReport) -> usize {
    let guard = RuntimeGuard;
    let mut flagged = 0usize;
    for (file, modules) in &report.file_graph {
        for module in modules {
            match guard.observe(file, module) {
                ObserveOutcome::Logged | ObserveOutcome::Blocked(_) => flagged += 1,
                ObserveOutcome::Allowed | ObserveOutcome::Abstained => {}
            }
        }
    }
    flagged
}
