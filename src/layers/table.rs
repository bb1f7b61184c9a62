// src/layers/table.rs
//! The layer table: config-declared layers merged with defaults,
//! ordered for deterministic classification.

use crate::config::{ArchConfig, LayerSpec};
use crate::error::{ArchError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

/// Fallback stack used when the configuration declares no layers.
const DEFAULT_LAYERS: &[(&str, u32)] = &[("core", 0), ("services", 1), ("app", 2)];

/// A named, tiered partition of the source tree.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub tier: u32,
    matcher: Option<GlobSet>,
    order: usize,
}

impl Layer {
    fn build(name: String, spec: &LayerSpec, order: usize) -> Self {
        let matcher = compile_patterns(&name, &spec.patterns);
        Self {
            name,
            tier: spec.tier,
            matcher,
            order,
        }
    }

    /// Whether this layer claims the given (forward-slash) path.
    ///
    /// Legacy fallback: a layer without patterns matches by the
    /// `src/<name>` substring.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            Some(set) => set.is_match(path),
            None => path.contains(&format!("src/{}", self.name)),
        }
    }
}

fn compile_patterns(layer: &str, patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    let mut added = 0usize;
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
                added += 1;
            }
            Err(e) => warn!(layer, pattern, "skipping malformed layer pattern: {e}"),
        }
    }

    if added == 0 {
        return None;
    }
    match builder.build() {
        Ok(set) => Some(set),
        Err(e) => {
            warn!(layer, "failed to build layer matcher: {e}");
            None
        }
    }
}

/// All configured layers, sorted by ascending tier then declared order.
#[derive(Debug, Clone, Default)]
pub struct LayerTable {
    layers: Vec<Layer>,
}

impl LayerTable {
    /// Builds the table from configuration, falling back to the default
    /// stack when no layers are declared.
    ///
    /// # Errors
    /// Returns a configuration error for duplicate layer names or
    /// malformed layer entries.
    pub fn load(config: &ArchConfig) -> Result<Self> {
        let specs = config.arch.layer_specs()?;
        if specs.is_empty() {
            return Ok(Self::defaults());
        }
        Self::from_specs(specs)
    }

    /// The fixed default table (no patterns; legacy substring matching).
    #[must_use]
    pub fn defaults() -> Self {
        let specs = DEFAULT_LAYERS
            .iter()
            .map(|(name, tier)| {
                (
                    (*name).to_string(),
                    LayerSpec {
                        tier: *tier,
                        patterns: Vec::new(),
                    },
                )
            })
            .collect();
        // Defaults are well-formed; from_specs cannot fail on them.
        Self::from_specs(specs).unwrap_or_default()
    }

    /// Builds the table from explicit (name, spec) pairs in declared order.
    ///
    /// # Errors
    /// Two layers with the same name (case-insensitive) are a fatal
    /// configuration error. Identical tiers are allowed (parallel layers).
    pub fn from_specs(specs: Vec<(String, LayerSpec)>) -> Result<Self> {
        let mut seen: Vec<String> = Vec::with_capacity(specs.len());
        for (name, _) in &specs {
            let lower = name.to_lowercase();
            if seen.contains(&lower) {
                return Err(ArchError::Config(format!(
                    "duplicate layer name '{name}'"
                )));
            }
            seen.push(lower);
        }

        let mut layers: Vec<Layer> = specs
            .into_iter()
            .enumerate()
            .map(|(order, (name, spec))| Layer::build(name, &spec, order))
            .collect();

        layers.sort_by(|a, b| a.tier.cmp(&b.tier).then(a.order.cmp(&b.order)));
        Ok(Self { layers })
    }

    /// Maps a file path to its layer. First match in tier order wins;
    /// deterministic and idempotent for a fixed table.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Option<&Layer> {
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.layers.iter().find(|layer| layer.matches(&normalized))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// The highest tier in the table; layers at this tier are the entry
    /// layers and may import anything.
    #[must_use]
    pub fn top_tier(&self) -> u32 {
        self.layers.iter().map(|l| l.tier).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_top(&self, layer: &Layer) -> bool {
        !self.layers.is_empty() && layer.tier == self.top_tier()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
