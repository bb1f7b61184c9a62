// src/graph/transitive.rs
//! Transitive escalation detection over the layer-level graph.
//!
//! For every ordered triple `A -> B -> C`, a chain is recorded as an
//! audit trail. The chain is a violation when it hands `A` effective
//! access to a strictly higher tier than its own. Chains longer than
//! three layers are not considered.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::analyzer::DependencyChain;
use crate::layers::LayerTable;
use crate::types::Violation;

/// Walks all layer triples, returning `(chains, violations)` in
/// deterministic order.
#[must_use]
pub fn analyze(
    table: &LayerTable,
    layer_deps: &BTreeMap<String, BTreeSet<String>>,
) -> (Vec<DependencyChain>, Vec<Violation>) {
    let mut chains = Vec::new();
    let mut violations = Vec::new();
    let top = table.top_tier();

    for (a, deps_a) in layer_deps {
        for b in deps_a {
            let Some(deps_b) = layer_deps.get(b) else {
                continue;
            };
            for c in deps_b {
                if c == a {
                    continue;
                }
                chains.push(DependencyChain {
                    from: a.clone(),
                    via: b.clone(),
                    to: c.clone(),
                });

                let (Some(from), Some(to)) = (table.get(a), table.get(c)) else {
                    continue;
                };
                if from.tier < top && to.tier > from.tier {
                    violations.push(Violation::transitive(
                        a.clone(),
                        c.clone(),
                        from.tier,
                        to.tier,
                        format!(
                            "{} (tier {}) gains access to {} (tier {}) via {}",
                            a, from.tier, c, to.tier, b
                        ),
                    ));
                }
            }
        }
    }

    (chains, violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerSpec;

    fn table(entries: &[(&str, u32)]) -> LayerTable {
        LayerTable::from_specs(
            entries
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
                .collect(),
        )
        .unwrap()
    }

    fn deps(edges: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, to) in edges {
            map.entry((*from).to_string())
                .or_default()
                .insert((*to).to_string());
            map.entry((*to).to_string()).or_default();
        }
        map
    }

    #[test]
    fn test_downward_chain_is_not_violation() {
        let t = table(&[("core", 0), ("lib", 1), ("app", 2)]);
        let d = deps(&[("app", "lib"), ("lib", "core")]);
        let (chains, violations) = analyze(&t, &d);
        assert!(chains.contains(&DependencyChain {
            from: "app".into(),
            via: "lib".into(),
            to: "core".into(),
        }));
        assert!(violations.is_empty());
    }

    #[test]
    fn test_upward_escalation_flagged() {
        let t = table(&[("core", 0), ("lib", 1), ("app", 2)]);
        let d = deps(&[("core", "lib"), ("lib", "app")]);
        let (_, violations) = analyze(&t, &d);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.source, "core");
        assert_eq!(v.target, "app");
        assert!(v.message.contains("via lib"));
    }

    #[test]
    fn test_top_tier_chain_exempt() {
        let t = table(&[("core", 0), ("lib", 1), ("app", 2)]);
        // app -> lib -> core is fine; also app -> lib with lib -> app
        // would put app at the start, and top tier is exempt.
        let d = deps(&[("app", "lib"), ("lib", "app")]);
        let (_, violations) = analyze(&t, &d);
        assert!(violations.iter().all(|v| v.source != "app"));
    }
}
