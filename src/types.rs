// src/types.rs
//! Common data structures shared across analyzers.

use serde::{Deserialize, Serialize};

/// How serious a violation is for reporting and gating purposes.
///
/// `Error` blocks in gatekeeper contexts (pre-write, strict runtime);
/// `Warning` is always advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Where a violation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// An edge that breaks the dependency rule by itself.
    Direct,
    /// An indirect path `A -> B -> C` escalating across a mid-layer.
    Transitive,
    /// Observed by the runtime import guard.
    Runtime,
    /// Emitted by a consistency rule; carries the rule id.
    Rule(String),
}

impl ViolationKind {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Transitive => "transitive",
            Self::Runtime => "runtime",
            Self::Rule(id) => id,
        }
    }
}

/// A single architecture or hygiene violation.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// File or module the edge originates from.
    pub source: String,
    /// Module or artifact on the receiving end.
    pub target: String,
    pub source_tier: Option<u32>,
    pub target_tier: Option<u32>,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    #[must_use]
    pub fn direct(
        source: impl Into<String>,
        target: impl Into<String>,
        source_tier: u32,
        target_tier: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Direct,
            source: source.into(),
            target: target.into(),
            source_tier: Some(source_tier),
            target_tier: Some(target_tier),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    #[must_use]
    pub fn transitive(
        source: impl Into<String>,
        target: impl Into<String>,
        source_tier: u32,
        target_tier: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::Transitive,
            source: source.into(),
            target: target.into(),
            source_tier: Some(source_tier),
            target_tier: Some(target_tier),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    #[must_use]
    pub fn rule(
        rule_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind: ViolationKind::Rule(rule_id.into()),
            source: source.into(),
            target: target.into(),
            source_tier: None,
            target_tier: None,
            message: message.into(),
            severity,
        }
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error && matches!(self.kind, ViolationKind::Direct | ViolationKind::Runtime)
    }
}
