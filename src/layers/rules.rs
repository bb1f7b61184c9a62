// src/layers/rules.rs
//! The dependency rule: an edge `A -> B` is valid iff
//! `tier(B) <= tier(A)`, or `A` sits on the top tier.

use super::table::{Layer, LayerTable};
use crate::types::{Severity, Violation, ViolationKind};

/// Evaluates a proposed edge from `source` to `target_module`.
///
/// Unknown modules (external packages, stdlib) are not the rule
/// engine's concern and return `None`. Equal-tier edges across
/// different layers are permitted unless `flag_equal_tier` is set, in
/// which case they yield a warning.
#[must_use]
pub fn check_edge(
    table: &LayerTable,
    source: &Layer,
    target_module: &str,
    flag_equal_tier: bool,
) -> Option<Violation> {
    let target = table.get(target_module)?;

    if target.name == source.name {
        return None;
    }
    if table.is_top(source) {
        return None;
    }

    if target.tier > source.tier {
        return Some(Violation::direct(
            source.name.clone(),
            target.name.clone(),
            source.tier,
            target.tier,
            format!(
                "{} (tier {}) must not import {} (tier {})",
                source.name, source.tier, target.name, target.tier
            ),
        ));
    }

    if flag_equal_tier && target.tier == source.tier {
        return Some(Violation {
            kind: ViolationKind::Direct,
            source: source.name.clone(),
            target: target.name.clone(),
            source_tier: Some(source.tier),
            target_tier: Some(target.tier),
            message: format!(
                "{} imports sibling layer {} at the same tier {}",
                source.name, target.name, source.tier
            ),
            severity: Severity::Warning,
        });
    }

    None
}
