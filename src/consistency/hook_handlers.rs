// src/consistency/hook_handlers.rs
//! Every declared event-handler reference points at a file that exists.
//!
//! References come from two places: the plugin manifest
//! (`hooks/hooks.json`) and the local settings file
//! (`.claude/settings.json`). Both share the same shape: nested hook
//! entries whose `command` strings embed handler paths.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::jsonc;
use crate::config::RuleToggle;
use crate::types::{Severity, Violation};

const MANIFEST_PATHS: &[&str] = &["hooks/hooks.json", ".claude/settings.json"];

const PROJECT_DIR_VAR: &str = "$CLAUDE_PROJECT_DIR/";

#[must_use]
pub fn check(root: &Path, rule: &RuleToggle) -> Vec<Violation> {
    let severity = rule.severity.unwrap_or(Severity::Error);
    let mut violations = Vec::new();

    for manifest in MANIFEST_PATHS {
        let path = root.join(manifest);
        // An absent or unreadable manifest means the rule cannot run
        // for that source; the other source still gets checked.
        let Ok(raw) = fs::read_to_string(&path) else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(&jsonc::strip_comments(&raw)) else {
            continue;
        };

        let mut commands = Vec::new();
        collect_commands(&value, &mut commands);

        for command in commands {
            for handler in handler_paths(&command) {
                if !root.join(&handler).exists() {
                    violations.push(Violation::rule(
                        "hook_handlers",
                        (*manifest).to_string(),
                        handler.clone(),
                        format!("hook handler {handler} referenced in {manifest} does not exist"),
                        severity,
                    ));
                }
            }
        }
    }

    violations
}

fn collect_commands(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if key == "command" {
                    if let Some(s) = v.as_str() {
                        out.push(s.to_string());
                    }
                }
                collect_commands(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_commands(v, out);
            }
        }
        _ => {}
    }
}

/// Path-looking tokens inside a command string, project-relative.
fn handler_paths(command: &str) -> Vec<String> {
    command
        .split_whitespace()
        .filter(|tok| !tok.starts_with('-') && !tok.contains("://"))
        .filter_map(|tok| {
            let tok = tok.strip_prefix(PROJECT_DIR_VAR).unwrap_or(tok);
            (tok.contains('/') && !tok.starts_with('/') && !tok.starts_with('$'))
                .then(|| tok.to_string())
        })
        .collect()
}
