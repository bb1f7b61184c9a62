// src/hooks/handlers.rs
//! Event handler dispatch for the external host.
//!
//! Each handler is one short-lived invocation: read a JSON request,
//! run the analyzers, emit a JSON reply on stdout. Internal errors are
//! never surfaced as denial; the fail-open rule applies throughout.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::config::ArchConfig;
use crate::consistency::ConsistencyChecker;
use crate::graph::imports;
use crate::guard::prewrite;
use crate::hooks::protocol::{HookRequest, HookResponse};
use crate::layers::{check_edge, LayerTable};
use crate::report::summary;
use crate::types::Severity;

/// Dispatches one event. Unknown events are allowed through.
#[must_use]
pub fn handle(
    event: &str,
    config: &ArchConfig,
    project_root: &Path,
    plugin_root: &Path,
    raw: &str,
) -> HookResponse {
    match event {
        "pre_write" | "PreToolUse" => pre_tool_use(config, project_root, raw),
        "post_write" | "PostToolUse" => post_tool_use(config, project_root, raw),
        "session_start" | "SessionStart" => session_start(config, project_root, plugin_root),
        // The prompt event carries no gating contract; acknowledge it.
        "prompt" | "UserPromptSubmit" => HookResponse::allow("UserPromptSubmit"),
        "stop" | "Stop" => stop_summary(config, project_root, plugin_root),
        other => {
            warn!(event = other, "unknown hook event, allowing");
            HookResponse::allow(other)
        }
    }
}

/// Reads one request from stdin, dispatches, prints the reply.
/// Always returns exit code 0: the decision is carried in the body.
pub fn run(event: &str, project_root: &Path, plugin_root: &Path) -> i32 {
    let mut raw = String::new();
    let _ = std::io::stdin().read_to_string(&mut raw);

    let config = ArchConfig::load(project_root).unwrap_or_else(|e| {
        warn!("config load failed, using defaults: {e}");
        ArchConfig::default()
    });

    let response = handle(event, &config, project_root, plugin_root, &raw);
    println!("{}", response.to_json());
    0
}

fn pre_tool_use(config: &ArchConfig, project_root: &Path, raw: &str) -> HookResponse {
    let Ok(request) = serde_json::from_str::<HookRequest>(raw) else {
        return HookResponse::allow("PreToolUse");
    };
    prewrite::evaluate(config, project_root, &request)
}

/// After a write landed: report violations it introduced and hint at
/// artifacts the new file still needs. Never blocking; the write
/// already happened.
fn post_tool_use(config: &ArchConfig, project_root: &Path, raw: &str) -> HookResponse {
    const EVENT: &str = "PostToolUse";

    if !config.hooks.enabled("post_write") {
        return HookResponse::allow(EVENT);
    }
    let Ok(request) = serde_json::from_str::<HookRequest>(raw) else {
        return HookResponse::allow(EVENT);
    };
    let Some(file_path) = request.tool_input.file_path.as_deref() else {
        return HookResponse::allow(EVENT);
    };

    let rel = Path::new(file_path)
        .strip_prefix(project_root)
        .unwrap_or(Path::new(file_path))
        .to_path_buf();

    let mut notes: Vec<String> = Vec::new();

    if let Ok(table) = LayerTable::load(config) {
        if let Some(layer) = table.classify(&rel) {
            if let Ok(content) = fs::read_to_string(project_root.join(&rel)) {
                let flag_equal = config.arch.flag_equal_tier_cross_layer;
                for module in imports::extract_modules(&rel, &content) {
                    if let Some(v) = check_edge(&table, layer, &module, flag_equal) {
                        if v.severity == Severity::Error {
                            notes.push(format!("violation: {}", v.message));
                        }
                    }
                }
            }
        }
    }

    let checker = ConsistencyChecker::new(project_root, config);
    for artifact in checker.missing_artifacts(&rel) {
        notes.push(format!("missing artifact: {artifact}"));
    }

    if notes.is_empty() {
        HookResponse::allow(EVENT)
    } else {
        HookResponse::warn(EVENT, notes.join("\n"))
    }
}

fn session_start(config: &ArchConfig, project_root: &Path, plugin_root: &Path) -> HookResponse {
    const EVENT: &str = "SessionStart";

    if !config.hooks.enabled("session_start") {
        return HookResponse::allow(EVENT);
    }
    HookResponse::warn(EVENT, summary::build(config, project_root, plugin_root))
}

fn stop_summary(config: &ArchConfig, project_root: &Path, plugin_root: &Path) -> HookResponse {
    const EVENT: &str = "Stop";

    if !config.hooks.enabled("stop") {
        return HookResponse::allow(EVENT);
    }
    match summary::drift_line(config, project_root, plugin_root) {
        Some(line) => HookResponse::warn(EVENT, line),
        None => HookResponse::allow(EVENT),
    }
}
