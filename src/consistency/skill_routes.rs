// src/consistency/skill_routes.rs
//! Every relative documentation route referenced from a skill or
//! command document resolves to an existing file.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::RuleToggle;
use crate::types::{Severity, Violation};

const DOC_GLOBS: &[&str] = &["skills/**/*.md", "commands/**/*.md"];

static ROUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"reference/[A-Za-z0-9._-]+\.md").expect("route regex"));

#[must_use]
pub fn check(root: &Path, rule: &RuleToggle) -> Vec<Violation> {
    let severity = rule.severity.unwrap_or(Severity::Error);
    let mut violations = Vec::new();

    for glob in DOC_GLOBS {
        for doc in super::files_matching(root, glob) {
            let Ok(content) = fs::read_to_string(root.join(&doc)) else {
                continue;
            };
            let doc_dir = doc.parent().unwrap_or(Path::new(""));

            for route in routes_in(&content) {
                if !root.join(doc_dir).join(route).exists() {
                    let source = doc.to_string_lossy().replace('\\', "/");
                    violations.push(Violation::rule(
                        "skill_routes",
                        source.clone(),
                        route.to_string(),
                        format!("{source} references {route}, which does not exist"),
                        severity,
                    ));
                }
            }
        }
    }

    violations
}

/// `reference/<name>.md` occurrences that start a relative path.
/// Matches embedded in a longer path or URL are not routes.
fn routes_in(content: &str) -> Vec<&str> {
    ROUTE_RE
        .find_iter(content)
        .filter(|m| {
            content[..m.start()]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric() && c != '/' && c != '.')
        })
        .map(|m| m.as_str())
        .collect()
}
