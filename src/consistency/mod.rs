// src/consistency/mod.rs
//! Cross-artifact consistency checks.
//!
//! These are project-hygiene invariants rather than import-rule
//! problems: missing tests, dangling hook references, undeclared
//! config keys, broken documentation routes, denied imports.

pub mod config_schema;
pub mod custom_imports;
pub mod hook_handlers;
pub mod skill_routes;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::ArchConfig;
use crate::types::{Severity, Violation};

/// Aggregated result of one `check_all` pass.
#[derive(Debug, Default)]
pub struct ConsistencyReport {
    pub violations: Vec<Violation>,
    pub rules_run: Vec<String>,
}

impl ConsistencyReport {
    /// True when no error-severity violation was found. Warnings
    /// (e.g. `module_tests`) do not fail the pass.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.violations.iter().all(|v| v.severity != Severity::Error)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn list(&self) -> &[Violation] {
        &self.violations
    }

    #[must_use]
    pub fn for_rule(&self, rule_id: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.kind.label() == rule_id)
            .collect()
    }
}

pub struct ConsistencyChecker<'a> {
    root: &'a Path,
    config: &'a ArchConfig,
}

impl<'a> ConsistencyChecker<'a> {
    #[must_use]
    pub fn new(root: &'a Path, config: &'a ArchConfig) -> Self {
        Self { root, config }
    }

    /// Runs every enabled rule. A rule that cannot run emits no
    /// violations but never prevents the others from running.
    #[must_use]
    pub fn check_all(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();
        if !self.config.consistency.enabled {
            return report;
        }
        let rules = &self.config.consistency.rules;

        if rules.module_tests.enabled {
            report.rules_run.push("module_tests".into());
            report
                .violations
                .extend(module_tests::check(self.root, &rules.module_tests));
        }
        if rules.hook_handlers.enabled {
            report.rules_run.push("hook_handlers".into());
            report
                .violations
                .extend(hook_handlers::check(self.root, &rules.hook_handlers));
        }
        if rules.config_schema.enabled {
            report.rules_run.push("config_schema".into());
            report
                .violations
                .extend(config_schema::check(self.root, &rules.config_schema));
        }
        if rules.skill_routes.enabled {
            report.rules_run.push("skill_routes".into());
            report
                .violations
                .extend(skill_routes::check(self.root, &rules.skill_routes));
        }
        if rules.custom_imports.enabled {
            report.rules_run.push("custom_imports".into());
            report
                .violations
                .extend(custom_imports::check(self.root, &rules.custom_imports));
        }

        report
    }

    /// Artifacts still missing for a just-created file; used by the
    /// post-write hint path.
    #[must_use]
    pub fn missing_artifacts(&self, path: &Path) -> Vec<String> {
        module_tests::missing_for(self.root, &self.config.consistency.rules.module_tests, path)
    }
}

/// Files under `root` (relative, forward-slash) matching a single glob.
/// Malformed globs are reported and yield nothing.
pub(crate) fn files_matching(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let matcher: GlobMatcher = match Glob::new(pattern) {
        Ok(g) => g.compile_matcher(),
        Err(e) => {
            warn!(pattern, "skipping malformed glob: {e}");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git" && e.file_name() != "node_modules")
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?.to_path_buf();
            matcher.is_match(&rel).then_some(rel)
        })
        .collect();

    files.sort();
    files
}
