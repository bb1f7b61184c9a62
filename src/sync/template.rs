// src/sync/template.rs
//! Minimal placeholder templating: `{{dotted.key}}` looked up in a
//! values map. Rendering is a pure function of (template bytes,
//! values map).

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::config::{jsonc, lookup, ArchConfig};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder regex"));

/// Substitutes every `{{dotted.key}}` placeholder. Missing keys render
/// as the empty string.
#[must_use]
pub fn render(template: &str, values: &Value) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            caps.get(1)
                .and_then(|key| lookup(values, key.as_str()))
                .map_or_else(String::new, format_value)
        })
        .into_owned()
}

/// Canonical rendering of a looked-up value: strings verbatim, booleans
/// as `true`/`false`, lists and mappings in their JSON form.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Builds the values map for one sync pass: base project values, then
/// the per-type preset, then the `common` preset, then user overrides.
/// Later layers win.
#[must_use]
pub fn build_values(config: &ArchConfig, plugin_root: &Path) -> Value {
    let mut values = base_values(config);

    merge(&mut values, load_preset(plugin_root, config.project.kind.preset_key()));
    merge(&mut values, load_preset(plugin_root, "common"));
    merge(&mut values, Value::Object(config.values.clone()));

    values
}

fn base_values(config: &ArchConfig) -> Value {
    serde_json::json!({
        "project": {
            "name": config.project.name,
            "type": config.project.kind.preset_key(),
            "source_root": config.project.source_root,
        }
    })
}

fn load_preset(plugin_root: &Path, key: &str) -> Value {
    let path = plugin_root.join("presets").join(format!("{key}.json"));
    fs::read_to_string(&path)
        .ok()
        .and_then(|raw| serde_json::from_str(&jsonc::strip_comments(&raw)).ok())
        .unwrap_or(Value::Object(serde_json::Map::new()))
}

/// Deep merge: objects merge key-wise, anything else is replaced.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.entry(key) {
                    serde_json::map::Entry::Occupied(mut occupied) => {
                        merge(occupied.get_mut(), value);
                    }
                    serde_json::map::Entry::Vacant(vacant) => {
                        vacant.insert(value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}
