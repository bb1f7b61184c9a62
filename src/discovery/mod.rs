// src/discovery/mod.rs
//! Code discovery: an index of existing definitions and similarity
//! queries against it, used to discourage accidental duplication.

pub mod defs;
pub mod similarity;

pub use defs::{extract, DefKind, Definition};
pub use similarity::{NameSimilarity, Similarity};

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::{ArchConfig, ProjectType};

/// One candidate/existing pair with its score. Callers hold matches by
/// value; the index stays owned by the engine.
#[derive(Debug, Clone)]
pub struct SimilarityMatch {
    pub candidate: Definition,
    pub existing: Definition,
    pub score: f64,
}

/// The definition index for one scan. Rebuilt per query scope; treated
/// as read-only by callers.
pub struct DiscoveryIndex {
    defs: Vec<Definition>,
    scorer: NameSimilarity,
}

impl DiscoveryIndex {
    /// Scans the configured glob patterns under `root` and extracts
    /// every definition. Unreadable or unparseable files contribute
    /// nothing.
    #[must_use]
    pub fn build(root: &Path, config: &ArchConfig) -> Self {
        let patterns = scan_patterns(config);
        let matcher = build_matcher(&patterns);
        let files = collect_files(root, matcher.as_ref());

        let mut defs: Vec<Definition> = files
            .par_iter()
            .filter_map(|rel| {
                let content = fs::read_to_string(root.join(rel)).ok()?;
                Some(defs::extract(rel, &content))
            })
            .flatten()
            .collect();

        defs.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then(a.name.cmp(&b.name))
        });

        Self {
            defs,
            scorer: NameSimilarity {
                min_substring_len: config.discovery.min_substring_len,
            },
        }
    }

    #[must_use]
    pub fn definitions(&self) -> &[Definition] {
        &self.defs
    }

    /// Scores every definition in `body` against the index.
    ///
    /// Same-kind only; `exclude_file` removes self-matches from the
    /// file being edited. Matches exactly at `threshold` are returned.
    /// Result is sorted by descending score.
    #[must_use]
    pub fn find_similar(
        &self,
        candidate_path: &Path,
        body: &str,
        threshold: f64,
        exclude_file: Option<&Path>,
    ) -> Vec<SimilarityMatch> {
        let candidates = defs::extract(candidate_path, body);
        let mut matches = Vec::new();

        for candidate in &candidates {
            for existing in &self.defs {
                if existing.kind != candidate.kind {
                    continue;
                }
                if exclude_file.is_some_and(|f| existing.file == f) {
                    continue;
                }
                let score = self.scorer.score(&candidate.name, &existing.name);
                if score >= threshold {
                    matches.push(SimilarityMatch {
                        candidate: candidate.clone(),
                        existing: existing.clone(),
                        score,
                    });
                }
            }
        }

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.existing.file.cmp(&b.existing.file))
                .then_with(|| a.existing.line.cmp(&b.existing.line))
        });
        matches
    }
}

fn scan_patterns(config: &ArchConfig) -> Vec<String> {
    if !config.discovery.scan_patterns.is_empty() {
        return config.discovery.scan_patterns.clone();
    }
    let defaults: &[&str] = match config.project.kind {
        ProjectType::Python => &["src/**/*.py"],
        ProjectType::Plugin => &["src/**/*.py", "hooks/**/*.py"],
        ProjectType::Node | ProjectType::Javascript => &["src/**/*.js", "src/**/*.jsx"],
        ProjectType::Nextjs | ProjectType::Typescript => &["src/**/*.ts", "src/**/*.tsx"],
    };
    defaults.iter().map(|s| (*s).to_string()).collect()
}

fn build_matcher(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut added = 0usize;
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                added += 1;
            }
            Err(e) => warn!(pattern, "skipping malformed scan pattern: {e}"),
        }
    }
    if added == 0 {
        return None;
    }
    builder.build().ok()
}

fn collect_files(root: &Path, matcher: Option<&GlobSet>) -> Vec<PathBuf> {
    let Some(matcher) = matcher else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
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
