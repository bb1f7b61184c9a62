// src/discovery/similarity.rs
//! Name-based similarity scoring.
//!
//! Intentionally shallow: the strategy is swappable so a body-AST or
//! embedding scorer can replace it without touching the pipeline.

/// A swappable similarity strategy over definition names.
pub trait Similarity: Send + Sync {
    /// Score in [0.0, 1.0]; symmetric; `score(a, a) == 1.0`.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// The shipped scorer: exact, case-insensitive, substring, then
/// word-overlap tiers.
#[derive(Debug, Clone)]
pub struct NameSimilarity {
    /// Names shorter than this never trigger the substring rule, so a
    /// one-letter name cannot trivially match inside a long one.
    pub min_substring_len: usize,
}

impl Default for NameSimilarity {
    fn default() -> Self {
        Self {
            min_substring_len: 3,
        }
    }
}

impl Similarity for NameSimilarity {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }

        let la = a.to_lowercase();
        let lb = b.to_lowercase();
        if la == lb {
            return 0.95;
        }

        let shortest = la.len().min(lb.len());
        if shortest >= self.min_substring_len && (la.contains(&lb) || lb.contains(&la)) {
            return 0.80;
        }

        jaccard(&split_words(a), &split_words(b)) * 0.7
    }
}

#[allow(clippy::cast_precision_loss)]
fn jaccard(a: &[String], b: &[String]) -> f64 {
    use std::collections::HashSet;

    let set_a: HashSet<&String> = a.iter().collect();
    let set_b: HashSet<&String> = b.iter().collect();
    let intersection = set_a.intersection(&set_b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Splits a name into lowercase words on underscores and camelCase
/// boundaries.
#[must_use]
pub fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || !c.is_alphanumeric() {
            flush(&mut words, &mut current);
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            flush(&mut words, &mut current);
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
