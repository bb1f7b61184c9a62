// src/sync/regions.rs
//! AUTO/CUSTOM fenced documents.
//!
//! Only the AUTO region is ever regenerated. Every byte before the
//! AUTO marker, inside the CUSTOM region, and after it is preserved
//! verbatim across a merge.

pub const AUTO_START: &str = "<!-- AUTO:START -->";
pub const AUTO_END: &str = "<!-- AUTO:END -->";
pub const CUSTOM_START: &str = "<!-- CUSTOM:START -->";
pub const CUSTOM_END: &str = "<!-- CUSTOM:END -->";

pub const DEFAULT_CUSTOM_BODY: &str = "add your documentation here";

/// A fenced document split at its markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    pub prelude: String,
    pub auto: String,
    pub custom: Option<CustomRegion>,
    /// Everything after `AUTO_END` when no CUSTOM markers exist.
    pub tail: String,
}

/// The CUSTOM region and the untouched text around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRegion {
    pub bridge: String,
    pub body: String,
    pub epilogue: String,
}

impl Regions {
    /// Splits a document at its markers. Returns `None` when the AUTO
    /// fence is absent or malformed.
    #[must_use]
    pub fn parse(content: &str) -> Option<Self> {
        let auto_start = content.find(AUTO_START)?;
        let prelude = content[..auto_start].to_string();
        let after_start = &content[auto_start + AUTO_START.len()..];

        let auto_end = after_start.find(AUTO_END)?;
        let auto = after_start[..auto_end].to_string();
        let after = &after_start[auto_end + AUTO_END.len()..];

        let custom = parse_custom(after);
        let tail = if custom.is_some() {
            String::new()
        } else {
            after.to_string()
        };

        Some(Self {
            prelude,
            auto,
            custom,
            tail,
        })
    }

    /// Replaces the AUTO region, normalized onto its own lines.
    pub fn set_auto(&mut self, content: &str) {
        self.auto = format!("\n{}\n", content.trim_matches('\n'));
    }

    /// Reassembles the document. Parsing then rendering without
    /// `set_auto` reproduces the input byte-for-byte.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.prelude);
        out.push_str(AUTO_START);
        out.push_str(&self.auto);
        out.push_str(AUTO_END);
        match &self.custom {
            Some(custom) => {
                out.push_str(&custom.bridge);
                out.push_str(CUSTOM_START);
                out.push_str(&custom.body);
                out.push_str(CUSTOM_END);
                out.push_str(&custom.epilogue);
            }
            None => out.push_str(&self.tail),
        }
        out
    }

    /// A full skeleton for documents that have no markers yet.
    #[must_use]
    pub fn skeleton(title: &str, auto: &str) -> String {
        format!(
            "# {title}\n\n{AUTO_START}\n{}\n{AUTO_END}\n\n{CUSTOM_START}\n{DEFAULT_CUSTOM_BODY}\n{CUSTOM_END}\n",
            auto.trim_matches('\n')
        )
    }

    /// Regenerates the AUTO region of `existing`, or emits a skeleton
    /// when markers are absent.
    #[must_use]
    pub fn merge(existing: Option<&str>, auto: &str, title: &str) -> String {
        match existing.and_then(Self::parse) {
            Some(mut regions) => {
                regions.set_auto(auto);
                regions.render()
            }
            None => Self::skeleton(title, auto),
        }
    }
}

fn parse_custom(after: &str) -> Option<CustomRegion> {
    let custom_start = after.find(CUSTOM_START)?;
    let bridge = after[..custom_start].to_string();
    let after_custom = &after[custom_start + CUSTOM_START.len()..];

    let custom_end = after_custom.find(CUSTOM_END)?;
    Some(CustomRegion {
        bridge,
        body: after_custom[..custom_end].to_string(),
        epilogue: after_custom[custom_end + CUSTOM_END.len()..].to_string(),
    })
}
