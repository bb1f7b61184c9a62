// src/report/summary.rs
//! Plain-text aggregated summaries for the hook paths. Hooks own
//! stdout for their JSON reply, so these strings travel inside the
//! reply body rather than being printed.

use std::path::Path;

use crate::config::ArchConfig;
use crate::consistency::ConsistencyChecker;
use crate::graph::DependencyAnalyzer;
use crate::hooks::cache::{ProtectionCache, DEFAULT_TTL_SECS};
use crate::layers::LayerTable;
use crate::sizing;
use crate::sync::{SyncEngine, SyncStatus};

/// The session-start report: analyzer stats, consistency counts,
/// managed-file drift, and cached protection state.
#[must_use]
pub fn build(config: &ArchConfig, project_root: &Path, plugin_root: &Path) -> String {
    let mut lines = vec!["archguard session report".to_string()];

    let size = sizing::measure(project_root, config);
    lines.push(format!(
        "  project: {} ({}, {} files)",
        display_name(config),
        size.size.label(),
        size.file_count
    ));

    match LayerTable::load(config) {
        Ok(table) => {
            let report = DependencyAnalyzer::new(config, &table).analyze(project_root);
            lines.push(format!(
                "  layers: {}; direct violations: {}; transitive: {}",
                table.len(),
                report.stats.direct_count,
                report.stats.transitive_count
            ));
        }
        Err(e) => lines.push(format!("  layers: configuration error ({e})")),
    }

    let consistency = ConsistencyChecker::new(project_root, config).check_all();
    lines.push(format!(
        "  consistency: {} violation(s) across {} rule(s)",
        consistency.count(),
        consistency.rules_run.len()
    ));

    if let Some(line) = drift_line(config, project_root, plugin_root) {
        lines.push(format!("  {line}"));
    } else {
        lines.push("  managed files: in sync".to_string());
    }

    let protection = match ProtectionCache::new(project_root).read_fresh(DEFAULT_TTL_SECS) {
        Some(true) => "protected (cached)",
        Some(false) => "unprotected (cached)",
        None => "unknown (cache stale)",
    };
    lines.push(format!("  branch protection: {protection}"));

    lines.join("\n")
}

/// One-line drift summary, or `None` when everything is in sync.
#[must_use]
pub fn drift_line(config: &ArchConfig, project_root: &Path, plugin_root: &Path) -> Option<String> {
    let results = SyncEngine::new(config, project_root, plugin_root).status_all();
    let outdated = results
        .iter()
        .filter(|r| r.status == SyncStatus::Outdated)
        .count();
    let missing = results
        .iter()
        .filter(|r| r.status == SyncStatus::Missing)
        .count();
    let errors = results
        .iter()
        .filter(|r| matches!(r.status, SyncStatus::Error(_)))
        .count();

    if outdated + missing + errors == 0 {
        return None;
    }
    Some(format!(
        "managed files: {outdated} outdated, {missing} missing, {errors} error(s)"
    ))
}

fn display_name(config: &ArchConfig) -> String {
    if config.project.name.is_empty() {
        "unnamed project".to_string()
    } else {
        config.project.name.clone()
    }
}
