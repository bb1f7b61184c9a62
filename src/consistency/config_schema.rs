// src/consistency/config_schema.rs
//! No top-level configuration key falls outside the schema document.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::{jsonc, ArchConfig, ConfigSchemaRule, CONFIG_PATH};
use crate::types::{Severity, Violation};

#[must_use]
pub fn check(root: &Path, rule: &ConfigSchemaRule) -> Vec<Violation> {
    let severity = rule.severity.unwrap_or(Severity::Error);

    // Both documents must be present and parseable for the rule to run.
    let Ok(config) = ArchConfig::load_raw(root) else {
        return Vec::new();
    };
    let Some(schema) = read_json(&root.join(&rule.schema_path)) else {
        return Vec::new();
    };

    let Some(config_keys) = config.as_object() else {
        return Vec::new();
    };
    let declared = schema
        .get("properties")
        .and_then(Value::as_object);

    let mut violations = Vec::new();
    for key in config_keys.keys() {
        if key == "$schema" {
            continue;
        }
        let known = declared.is_some_and(|props| props.contains_key(key));
        if !known {
            violations.push(Violation::rule(
                "config_schema",
                CONFIG_PATH.to_string(),
                key.clone(),
                format!("config key '{key}' is not declared in {}", rule.schema_path),
                severity,
            ));
        }
    }

    violations
}

fn read_json(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&jsonc::strip_comments(&raw)).ok()
}
