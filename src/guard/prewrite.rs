// src/guard/prewrite.rs
//! The pre-write architecture guard.
//!
//! Sits in front of Write/Edit tool calls, simulates the post-write
//! file body, and decides ALLOW / DENY. Any internal error
//! short-circuits to ALLOW: the host must never be wedged by a
//! misbehaving guard.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::ArchConfig;
use crate::discovery::DiscoveryIndex;
use crate::error::Result;
use crate::graph::imports;
use crate::hooks::protocol::{HookRequest, HookResponse};
use crate::lang::Lang;
use crate::layers::{check_edge, LayerTable};
use crate::types::Severity;

const EVENT: &str = "PreToolUse";

/// Maximum discovery matches surfaced in one warning.
const MAX_MATCHES: usize = 3;

/// Evaluates one Write/Edit request. Fail-open on every unexpected
/// error path.
#[must_use]
pub fn evaluate(config: &ArchConfig, project_root: &Path, request: &HookRequest) -> HookResponse {
    match evaluate_inner(config, project_root, request) {
        Ok(response) => response,
        Err(e) => {
            warn!("pre-write guard error, allowing: {e}");
            HookResponse::allow(EVENT)
        }
    }
}

fn evaluate_inner(
    config: &ArchConfig,
    project_root: &Path,
    request: &HookRequest,
) -> Result<HookResponse> {
    if !config.hooks.arch_guard.enabled {
        return Ok(HookResponse::allow(EVENT));
    }

    let Some(file_path) = request.tool_input.file_path.as_deref() else {
        return Ok(HookResponse::allow(EVENT));
    };
    let rel = relative(file_path, project_root);

    // Out-of-jurisdiction files pass untouched.
    if Lang::from_path(Path::new(&rel)).is_none() {
        return Ok(HookResponse::allow(EVENT));
    }
    let Some(body) = reconstruct(request, project_root) else {
        return Ok(HookResponse::allow(EVENT));
    };

    let table = LayerTable::load(config)?;
    let Some(layer) = table.classify(Path::new(&rel)) else {
        return Ok(HookResponse::allow(EVENT));
    };

    let modules = imports::extract_modules(Path::new(&rel), &body);
    let flag_equal = config.arch.flag_equal_tier_cross_layer;
    for module in &modules {
        if let Some(violation) = check_edge(&table, layer, module, flag_equal) {
            if violation.severity == Severity::Error {
                return Ok(HookResponse::deny(
                    EVENT,
                    format!("Architecture violation in {rel}: {}", violation.message),
                ));
            }
        }
    }

    if config.hooks.arch_guard.discovery_enabled {
        if let Some(context) = discovery_warning(config, project_root, &rel, &body) {
            return Ok(HookResponse::warn(EVENT, context));
        }
    }

    Ok(HookResponse::allow(EVENT))
}

/// The would-be file body after the tool call. `None` when it cannot
/// be reconstructed.
fn reconstruct(request: &HookRequest, project_root: &Path) -> Option<String> {
    let input = &request.tool_input;
    match request.tool_name.as_str() {
        "Write" => input.content.clone(),
        "Edit" => {
            let file_path = input.file_path.as_deref()?;
            let old = input.old_string.as_deref()?;
            let new = input.new_string.as_deref()?;
            let on_disk = fs::read_to_string(project_root.join(relative(file_path, project_root)))
                .or_else(|_| fs::read_to_string(file_path))
                .ok()?;
            Some(on_disk.replacen(old, new, 1))
        }
        _ => None,
    }
}

fn discovery_warning(
    config: &ArchConfig,
    project_root: &Path,
    rel: &str,
    body: &str,
) -> Option<String> {
    let threshold = config.hooks.arch_guard.discovery_threshold;
    let index = DiscoveryIndex::build(project_root, config);
    let matches = index.find_similar(Path::new(rel), body, threshold, Some(Path::new(rel)));
    if matches.is_empty() {
        return None;
    }

    let mut lines = vec!["Similar definitions already exist:".to_string()];
    for m in matches.iter().take(MAX_MATCHES) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (m.score * 100.0).round() as u32;
        lines.push(format!(
            "  {} ~ {} ({}:{}) `{}` {pct}%",
            m.candidate.name,
            m.existing.name,
            m.existing.file.display(),
            m.existing.line,
            m.existing.signature,
        ));
    }
    Some(lines.join("\n"))
}

fn relative(file_path: &str, project_root: &Path) -> String {
    Path::new(file_path)
        .strip_prefix(project_root)
        .unwrap_or(Path::new(file_path))
        .to_string_lossy()
        .replace('\\', "/")
}
