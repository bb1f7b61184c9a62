// src/sync/engine.rs
//! The managed-file sync engine: renders declarative entries to disk
//! and detects drift between disk and expected content.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{ArchConfig, ManagedEntrySpec};
use crate::error::{ArchError, Result};
use crate::sync::regions::Regions;
use crate::sync::template;

/// Category of a managed entry; drives category-specific rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Linters,
    Github,
    Config,
    Ignore,
    Docs,
}

impl Category {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "linters" => Some(Self::Linters),
            "github" => Some(Self::Github),
            "config" => Some(Self::Config),
            "ignore" => Some(Self::Ignore),
            "docs" => Some(Self::Docs),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Linters => "linters",
            Self::Github => "github",
            Self::Config => "config",
            Self::Ignore => "ignore",
            Self::Docs => "docs",
        }
    }
}

/// A resolved managed-file declaration.
#[derive(Debug, Clone)]
pub struct ManagedEntry {
    pub output_path: String,
    pub template_refs: Vec<String>,
    pub enabled: bool,
    pub category: Category,
    pub kind: Option<String>,
}

/// Outcome of one entry in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Generated,
    InSync,
    Outdated,
    Missing,
    Disabled,
    Error(String),
}

impl SyncStatus {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Generated => "generated".to_string(),
            Self::InSync => "in sync".to_string(),
            Self::Outdated => "outdated".to_string(),
            Self::Missing => "missing".to_string(),
            Self::Disabled => "disabled".to_string(),
            Self::Error(msg) => format!("error: {msg}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncResult {
    pub path: String,
    pub ok: bool,
    pub status: SyncStatus,
}

pub struct SyncEngine<'a> {
    config: &'a ArchConfig,
    project_root: &'a Path,
    plugin_root: &'a Path,
}

impl<'a> SyncEngine<'a> {
    #[must_use]
    pub fn new(config: &'a ArchConfig, project_root: &'a Path, plugin_root: &'a Path) -> Self {
        Self {
            config,
            project_root,
            plugin_root,
        }
    }

    /// Resolves the `managed` table into entries.
    ///
    /// # Errors
    /// Duplicate output paths across categories are a configuration
    /// error.
    pub fn entries(&self) -> Result<Vec<ManagedEntry>> {
        let mut entries = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for (category_key, table) in &self.config.managed {
            let Some(category) = Category::from_key(category_key) else {
                debug!(category = category_key, "ignoring unknown managed category");
                continue;
            };
            for (output_path, spec) in table {
                if seen.contains(&output_path.as_str()) {
                    return Err(ArchError::Config(format!(
                        "managed output path '{output_path}' is declared more than once"
                    )));
                }
                seen.push(output_path.as_str());
                entries.push(build_entry(category, output_path, spec));
            }
        }

        Ok(entries)
    }

    /// Renders every enabled entry to disk. A failing entry records an
    /// error result; the pass always continues.
    #[must_use]
    pub fn sync_all(&self) -> Vec<SyncResult> {
        self.run_pass(true)
    }

    /// Read-only drift detection: renders in memory and compares
    /// against disk. Never writes, never deletes.
    #[must_use]
    pub fn status_all(&self) -> Vec<SyncResult> {
        self.run_pass(false)
    }

    fn run_pass(&self, write: bool) -> Vec<SyncResult> {
        let entries = match self.entries() {
            Ok(entries) => entries,
            Err(e) => {
                return vec![SyncResult {
                    path: String::new(),
                    ok: false,
                    status: SyncStatus::Error(e.to_string()),
                }]
            }
        };

        let values = template::build_values(self.config, self.plugin_root);
        entries
            .iter()
            .map(|entry| {
                if write {
                    self.sync_entry(entry, &values)
                } else {
                    self.status_entry(entry, &values)
                }
            })
            .collect()
    }

    fn sync_entry(&self, entry: &ManagedEntry, values: &serde_json::Value) -> SyncResult {
        if !entry.enabled {
            return result(entry, true, SyncStatus::Disabled);
        }

        let expected = match self.expected_content(entry, values) {
            Ok(expected) => expected,
            Err(e) => return result(entry, false, SyncStatus::Error(e.to_string())),
        };

        let target = self.project_root.join(&entry.output_path);
        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return result(entry, false, SyncStatus::Error(e.to_string()));
            }
        }
        match fs::write(&target, &expected) {
            Ok(()) => result(entry, true, SyncStatus::Generated),
            Err(e) => result(entry, false, SyncStatus::Error(e.to_string())),
        }
    }

    fn status_entry(&self, entry: &ManagedEntry, values: &serde_json::Value) -> SyncResult {
        if !entry.enabled {
            return result(entry, true, SyncStatus::Disabled);
        }

        let expected = match self.expected_content(entry, values) {
            Ok(expected) => expected,
            Err(e) => return result(entry, false, SyncStatus::Error(e.to_string())),
        };

        let target = self.project_root.join(&entry.output_path);
        let Ok(actual) = fs::read_to_string(&target) else {
            return result(entry, false, SyncStatus::Missing);
        };

        if digest(&actual) == digest(&expected) {
            result(entry, true, SyncStatus::InSync)
        } else {
            result(entry, false, SyncStatus::Outdated)
        }
    }

    /// The content this entry should have on disk right now.
    fn expected_content(&self, entry: &ManagedEntry, values: &serde_json::Value) -> Result<String> {
        let mut pieces = Vec::with_capacity(entry.template_refs.len());
        for template_ref in &entry.template_refs {
            let raw = self.read_template(template_ref)?;
            pieces.push((template_ref.clone(), template::render(&raw, values)));
        }

        if entry.category == Category::Ignore {
            return Ok(concat_ignore(&pieces));
        }

        let rendered = pieces
            .into_iter()
            .map(|(_, piece)| piece)
            .collect::<Vec<_>>()
            .join("");

        if self.is_regions_doc(entry) {
            let target = self.project_root.join(&entry.output_path);
            let existing = fs::read_to_string(&target).ok();
            let title = doc_title(self.config, entry);
            return Ok(Regions::merge(existing.as_deref(), &rendered, &title));
        }

        Ok(rendered)
    }

    fn read_template(&self, template_ref: &str) -> Result<String> {
        let path = self.plugin_root.join(template_ref);
        fs::read_to_string(&path)
            .map_err(|_| ArchError::Template(format!("template {template_ref} not found")))
    }

    fn is_regions_doc(&self, entry: &ManagedEntry) -> bool {
        entry.kind.as_deref() == Some("claude-md")
            || entry.output_path.ends_with("CLAUDE.md")
    }
}

fn build_entry(category: Category, output_path: &str, spec: &ManagedEntrySpec) -> ManagedEntry {
    ManagedEntry {
        output_path: output_path.to_string(),
        template_refs: spec.template.as_vec(),
        enabled: spec.enabled,
        category,
        kind: spec.kind.clone(),
    }
}

fn result(entry: &ManagedEntry, ok: bool, status: SyncStatus) -> SyncResult {
    SyncResult {
        path: entry.output_path.clone(),
        ok,
        status,
    }
}

/// Concatenates ignore templates, inserting a section header before
/// every piece other than the `common` base.
fn concat_ignore(pieces: &[(String, String)]) -> String {
    let mut out = String::new();
    for (template_ref, piece) in pieces {
        let stem = ref_stem(template_ref);
        if stem != "common" {
            out.push_str(&format!("# --- {stem} ---\n"));
        }
        out.push_str(piece);
        if !piece.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn ref_stem(template_ref: &str) -> String {
    PathBuf::from(template_ref)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn digest(content: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.finalize().into()
}

fn doc_title(config: &ArchConfig, entry: &ManagedEntry) -> String {
    if config.project.name.is_empty() {
        PathBuf::from(&entry.output_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        config.project.name.clone()
    }
}
