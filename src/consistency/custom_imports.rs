// src/consistency/custom_imports.rs
//! Project-specific import rules: `deny` forbids a module in matching
//! files, `require` demands it.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::CustomImportsRule;
use crate::graph::imports;
use crate::types::{Severity, Violation};

#[must_use]
pub fn check(root: &Path, rule: &CustomImportsRule) -> Vec<Violation> {
    let severity = rule.severity.unwrap_or(Severity::Error);
    let mut violations = Vec::new();

    for entry in &rule.deny {
        check_entry(root, entry, severity, Direction::Deny, &mut violations);
    }
    for entry in &rule.require {
        check_entry(root, entry, severity, Direction::Require, &mut violations);
    }

    violations
}

#[derive(Clone, Copy)]
enum Direction {
    Deny,
    Require,
}

fn check_entry(
    root: &Path,
    entry: &str,
    severity: Severity,
    direction: Direction,
    violations: &mut Vec<Violation>,
) {
    let Some((glob, module)) = parse_entry(entry) else {
        warn!(entry, "skipping malformed custom_imports entry (expected '<glob> -> <module>')");
        return;
    };

    for file in super::files_matching(root, glob) {
        let Ok(content) = fs::read_to_string(root.join(&file)) else {
            continue;
        };
        let modules = imports::extract_modules(&file, &content);
        let present = modules.iter().any(|m| m == module);
        let source = file.to_string_lossy().replace('\\', "/");

        match direction {
            Direction::Deny if present => violations.push(Violation::rule(
                "custom_imports",
                source.clone(),
                module.to_string(),
                format!("{source} imports denied module {module}"),
                severity,
            )),
            Direction::Require if !present => violations.push(Violation::rule(
                "custom_imports",
                source.clone(),
                module.to_string(),
                format!("{source} is missing required import {module}"),
                severity,
            )),
            _ => {}
        }
    }
}

fn parse_entry(entry: &str) -> Option<(&str, &str)> {
    let (glob, module) = entry.split_once("->")?;
    let glob = glob.trim();
    let module = module.trim();
    if glob.is_empty() || module.is_empty() {
        return None;
    }
    Some((glob, module))
}
