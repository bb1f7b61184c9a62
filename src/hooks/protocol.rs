// src/hooks/protocol.rs
//! The event-handler wire protocol: one JSON request on stdin, one
//! JSON reply on stdout. Exit code is always 0; the decision lives in
//! the body, and a crashed handler is treated as ALLOW by the host.

use serde::{Deserialize, Serialize};

/// Request envelope for tool-gating events.
#[derive(Debug, Clone, Deserialize)]
pub struct HookRequest {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub old_string: Option<String>,
    #[serde(default)]
    pub new_string: Option<String>,
}

/// Reply envelope. Field names follow the host's wire format exactly.
#[derive(Debug, Clone, Serialize)]
pub struct HookResponse {
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub proceed: Option<bool>,
    #[serde(rename = "hookSpecificOutput")]
    pub output: HookOutput,
}

#[derive(Debug, Clone, Serialize)]
pub struct HookOutput {
    #[serde(rename = "hookEventName")]
    pub event: String,
    #[serde(rename = "permissionDecision", skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(rename = "permissionDecisionReason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "additionalContext", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl HookResponse {
    #[must_use]
    pub fn allow(event: &str) -> Self {
        Self {
            proceed: Some(true),
            output: HookOutput {
                event: event.to_string(),
                decision: None,
                reason: None,
                context: None,
            },
        }
    }

    #[must_use]
    pub fn deny(event: &str, reason: impl Into<String>) -> Self {
        Self {
            proceed: None,
            output: HookOutput {
                event: event.to_string(),
                decision: Some("deny".to_string()),
                reason: Some(reason.into()),
                context: None,
            },
        }
    }

    #[must_use]
    pub fn warn(event: &str, context: impl Into<String>) -> Self {
        Self {
            proceed: Some(true),
            output: HookOutput {
                event: event.to_string(),
                decision: None,
                reason: None,
                context: Some(context.into()),
            },
        }
    }

    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.output.decision.as_deref() == Some("deny")
    }

    /// Serialized reply; infallible shape, so a fallback ALLOW string
    /// is produced if serialization ever fails.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"continue":true,"hookSpecificOutput":{"hookEventName":"PreToolUse"}}"#.to_string()
        })
    }
}
