// src/graph/analyzer.rs
//! The dependency analyzer: walks the project tree, builds the
//! file-level import graph and the layer-level dependency map, and
//! grades every edge against the dependency rule.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ArchConfig;
use crate::graph::imports;
use crate::graph::transitive;
use crate::layers::{check_edge, LayerTable};
use crate::types::Violation;

/// Directory names never descended into.
const PRUNE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
    ".next",
    "coverage",
    ".cache",
];

/// A length-three chain `from -> via -> to`, emitted for every
/// layer-level triple regardless of violation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChain {
    pub from: String,
    pub via: String,
    pub to: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisStats {
    pub files_scanned: usize,
    pub files_errored: usize,
    pub per_layer: BTreeMap<String, usize>,
    pub direct_count: usize,
    pub transitive_count: usize,
}

/// The complete result of one analysis pass. Downstream consumers get
/// this snapshot by value; the analyzer holds no state between passes.
#[derive(Debug, Default)]
pub struct DependencyReport {
    pub file_graph: BTreeMap<String, Vec<String>>,
    pub layer_deps: BTreeMap<String, BTreeSet<String>>,
    pub direct_violations: Vec<Violation>,
    pub transitive_violations: Vec<Violation>,
    pub chains: Vec<DependencyChain>,
    pub stats: AnalysisStats,
}

pub struct DependencyAnalyzer<'a> {
    config: &'a ArchConfig,
    table: &'a LayerTable,
}

impl<'a> DependencyAnalyzer<'a> {
    #[must_use]
    pub fn new(config: &'a ArchConfig, table: &'a LayerTable) -> Self {
        Self { config, table }
    }

    /// Runs one full analysis pass over `root`.
    ///
    /// Per-file errors are non-fatal: unreadable files are skipped and
    /// counted in `stats.files_errored`.
    #[must_use]
    pub fn analyze(&self, root: &Path) -> DependencyReport {
        let mut report = DependencyReport::default();
        for layer in self.table.iter() {
            report.layer_deps.insert(layer.name.clone(), BTreeSet::new());
            report.stats.per_layer.insert(layer.name.clone(), 0);
        }

        for path in self.collect_files(root) {
            let Some(rel) = relative_key(&path, root) else {
                continue;
            };
            let Ok(content) = fs::read_to_string(&path) else {
                report.stats.files_errored += 1;
                continue;
            };
            report.stats.files_scanned += 1;
            self.grade_file(&rel, &content, &mut report);
        }

        let (chains, violations) = transitive::analyze(self.table, &report.layer_deps);
        report.chains = chains;
        report.transitive_violations = violations;
        report.stats.direct_count = report.direct_violations.len();
        report.stats.transitive_count = report.transitive_violations.len();
        report
    }

    fn grade_file(&self, rel: &str, content: &str, report: &mut DependencyReport) {
        let modules = imports::extract_modules(Path::new(rel), content);
        report.file_graph.insert(rel.to_string(), modules.clone());

        // Files outside any layer stay in the graph but are not graded.
        let Some(layer) = self.table.classify(Path::new(rel)) else {
            return;
        };
        if let Some(count) = report.stats.per_layer.get_mut(&layer.name) {
            *count += 1;
        }

        let flag_equal = self.config.arch.flag_equal_tier_cross_layer;
        for module in &modules {
            if let Some(target) = self.table.get(module) {
                if target.name != layer.name {
                    if let Some(deps) = report.layer_deps.get_mut(&layer.name) {
                        deps.insert(target.name.clone());
                    }
                }
            }
            if let Some(mut violation) = check_edge(self.table, layer, module, flag_equal) {
                violation.source = rel.to_string();
                report.direct_violations.push(violation);
            }
        }
    }

    /// Collects candidate source files in deterministic lexicographic
    /// order so violation lists are stable across runs.
    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let extensions = self.config.project.kind.source_extensions();
        let excluded = &self.config.arch.exclude_dirs;

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                !(e.file_type().is_dir()
                    && (PRUNE_DIRS.contains(&name.as_ref())
                        || excluded.iter().any(|d| d == name.as_ref())))
            })
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| extensions.contains(&ext))
            })
            .map(walkdir::DirEntry::into_path)
            .collect();

        files.sort();
        files
    }
}

fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
