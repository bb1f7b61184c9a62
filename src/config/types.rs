// src/config/types.rs
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Project flavor; selects source extensions, extraction strategy, and
/// ignore-template presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Python,
    #[default]
    Node,
    Nextjs,
    Typescript,
    Javascript,
    Plugin,
}

impl ProjectType {
    /// Extensions the dependency analyzer considers source files.
    #[must_use]
    pub fn source_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Python | Self::Plugin => &["py"],
            Self::Node | Self::Javascript => &["js", "jsx", "mjs", "cjs"],
            Self::Nextjs | Self::Typescript => &["ts", "tsx", "js", "jsx"],
        }
    }

    /// Key used to pick the per-type preset values file.
    #[must_use]
    pub fn preset_key(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Node => "node",
            Self::Nextjs => "nextjs",
            Self::Typescript => "typescript",
            Self::Javascript => "javascript",
            Self::Plugin => "plugin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectType,
    #[serde(default = "default_source_root")]
    pub source_root: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ProjectType::default(),
            source_root: default_source_root(),
        }
    }
}

fn default_source_root() -> String {
    "src".to_string()
}

/// One layer as declared in config: `arch.layers.<name>.{tier, patterns}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub tier: u32,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchSection {
    /// Declared order is significant: it is the tie-break after tier.
    #[serde(default)]
    pub layers: serde_json::Map<String, serde_json::Value>,
    /// Flag equal-tier imports across *different* layers as warnings.
    #[serde(default)]
    pub flag_equal_tier_cross_layer: bool,
    /// Extra directory names excluded from analysis (vendor/build trees).
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

impl ArchSection {
    /// Decodes the declared layers in declaration order.
    ///
    /// # Errors
    /// Returns a configuration error when a layer entry is malformed.
    pub fn layer_specs(&self) -> crate::error::Result<Vec<(String, LayerSpec)>> {
        let mut specs = Vec::with_capacity(self.layers.len());
        for (name, value) in &self.layers {
            let spec: LayerSpec = serde_json::from_value(value.clone()).map_err(|e| {
                crate::error::ArchError::Config(format!("layer '{name}' is malformed: {e}"))
            })?;
            specs.push((name.clone(), spec));
        }
        Ok(specs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchGuardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub discovery_enabled: bool,
    #[serde(default = "default_discovery_threshold")]
    pub discovery_threshold: f64,
    #[serde(default)]
    pub strict: bool,
}

impl Default for ArchGuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            discovery_enabled: true,
            discovery_threshold: default_discovery_threshold(),
            strict: false,
        }
    }
}

fn default_discovery_threshold() -> f64 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for HookToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooksConfig {
    #[serde(default)]
    pub arch_guard: ArchGuardConfig,
    #[serde(flatten)]
    pub toggles: HashMap<String, HookToggle>,
}

impl HooksConfig {
    /// Whether the named hook is enabled; absent hooks default to on.
    #[must_use]
    pub fn enabled(&self, name: &str) -> bool {
        if name == "arch_guard" {
            return self.arch_guard.enabled;
        }
        self.toggles.get(name).map_or(true, |t| t.enabled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub scan_patterns: Vec<String>,
    /// Minimum word length before the substring similarity rule applies.
    #[serde(default = "default_min_substring_len")]
    pub min_substring_len: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            scan_patterns: Vec::new(),
            min_substring_len: default_min_substring_len(),
        }
    }
}

fn default_min_substring_len() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleTestsRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Source glob -> test path template (`{stem}` and `{name}` expand).
    #[serde(default)]
    pub patterns: HashMap<String, String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for ModuleTestsRule {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: HashMap::new(),
            exclude: Vec::new(),
            severity: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchemaRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_schema_path")]
    pub schema_path: String,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for ConfigSchemaRule {
    fn default() -> Self {
        Self {
            enabled: true,
            schema_path: default_schema_path(),
            severity: None,
        }
    }
}

fn default_schema_path() -> String {
    "config.schema.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for RuleToggle {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomImportsRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `"<source_glob> -> <forbidden_module>"` entries.
    #[serde(default)]
    pub deny: Vec<String>,
    /// `"<source_glob> -> <required_module>"` entries.
    #[serde(default)]
    pub require: Vec<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Default for CustomImportsRule {
    fn default() -> Self {
        Self {
            enabled: true,
            deny: Vec::new(),
            require: Vec::new(),
            severity: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub module_tests: ModuleTestsRule,
    #[serde(default)]
    pub hook_handlers: RuleToggle,
    #[serde(default)]
    pub config_schema: ConfigSchemaRule,
    #[serde(default)]
    pub skill_routes: RuleToggle,
    #[serde(default)]
    pub custom_imports: CustomImportsRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: RulesConfig::default(),
        }
    }
}

/// Either one template ref or a list (concatenated for ignore files).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Single(String),
    List(Vec<String>),
}

impl TemplateRef {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s],
            Self::List(l) => l,
        }
    }

    #[must_use]
    pub fn as_vec(&self) -> Vec<String> {
        self.clone().into_vec()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedEntrySpec {
    pub template: TemplateRef,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub arch: ArchSection,
    #[serde(default)]
    pub hooks: HooksConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
    /// Category -> output path -> entry. BTreeMap keeps sync order stable.
    #[serde(default)]
    pub managed: BTreeMap<String, BTreeMap<String, ManagedEntrySpec>>,
    /// User overrides for the template values map (highest precedence).
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

const fn default_true() -> bool {
    true
}
