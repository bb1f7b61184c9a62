// src/config/mod.rs
pub mod jsonc;
pub mod types;

pub use self::types::{
    ArchConfig, ArchGuardConfig, ArchSection, ConfigSchemaRule, ConsistencyConfig,
    CustomImportsRule, DiscoveryConfig, HookToggle, HooksConfig, LayerSpec, ManagedEntrySpec,
    ModuleTestsRule, ProjectConfig, ProjectType, RuleToggle, RulesConfig, TemplateRef,
};

use crate::error::{ArchError, Result};
use std::fs;
use std::path::Path;

/// Fixed location of the configuration document under the project root.
pub const CONFIG_PATH: &str = ".claude/arch.jsonc";

impl ArchConfig {
    /// Loads the configuration from `.claude/arch.jsonc` under `project_root`.
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    /// Returns a configuration error when the file exists but cannot be
    /// read or parsed.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_PATH);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| ArchError::Io {
            source,
            path: path.clone(),
        })?;
        Self::parse(&raw)
    }

    /// Parses a JSONC document into a typed configuration.
    ///
    /// # Errors
    /// Returns `ArchError::Config` on malformed JSON.
    pub fn parse(raw: &str) -> Result<Self> {
        let stripped = jsonc::strip_comments(raw);
        serde_json::from_str(&stripped).map_err(|e| ArchError::Config(e.to_string()))
    }

    /// Loads the configuration as an untyped value. Used by the schema
    /// consistency check, which needs the raw top-level keys.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_raw(project_root: &Path) -> Result<serde_json::Value> {
        let path = project_root.join(CONFIG_PATH);
        let raw = fs::read_to_string(&path).map_err(|source| ArchError::Io {
            source,
            path: path.clone(),
        })?;
        let stripped = jsonc::strip_comments(&raw);
        serde_json::from_str(&stripped).map_err(|e| ArchError::Config(e.to_string()))
    }
}

/// Resolves a dotted key path (`"a.b.c"`) inside a JSON value.
///
/// Kept as a thin boundary accessor; typed structs are the norm
/// everywhere else.
#[must_use]
pub fn lookup<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
