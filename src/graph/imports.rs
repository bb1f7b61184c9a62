// src/graph/imports.rs
//! Import extraction.
//!
//! `ImportExtractor` yields raw import specifiers from source text.
//! Python uses a real Tree-sitter parse; TypeScript-like source uses a
//! regex family as the documented fallback. Both feed
//! [`normalize_specifier`] to reduce specifiers to module names.

use crate::lang::Lang;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tree_sitter::{Language, Parser, Query, QueryCursor};

/// Extracts raw import specifiers from source text.
pub trait ImportExtractor: Send + Sync {
    fn extract(&self, content: &str) -> Vec<String>;
}

/// Tree-sitter backed extraction for grammars where a parse is feasible.
pub struct TreeSitterExtractor {
    lang: Lang,
}

impl TreeSitterExtractor {
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }
}

impl ImportExtractor for TreeSitterExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        let grammar = self.lang.grammar();
        let Ok(query) = Query::new(grammar, self.lang.q_imports()) else {
            return Vec::new();
        };
        run_query(content, grammar, &query)
    }
}

fn run_query(source: &str, lang: Language, query: &Query) -> Vec<String> {
    let mut parser = Parser::new();
    if parser.set_language(lang).is_err() {
        return Vec::new();
    }

    let Some(tree) = parser.parse(source, None) else {
        return Vec::new();
    };
    // Syntax-error files emit nothing rather than partial edges.
    if tree.root_node().has_error() {
        return Vec::new();
    }

    let mut cursor = QueryCursor::new();
    let matches = cursor.matches(query, tree.root_node(), source.as_bytes());
    let mut imports = Vec::new();

    for m in matches {
        for capture in m.captures {
            if let Ok(text) = capture.node.utf8_text(source.as_bytes()) {
                imports.push(clean_text(text));
            }
        }
    }

    imports
}

fn clean_text(text: &str) -> String {
    // Remove quotes for JS/TS string specifiers
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

// The regex family: named, namespace, side-effect, require-style,
// and re-export import forms.
static NAMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:type\s+)?[^'"\n;]+?from\s+['"]([^'"]+)['"]"#)
        .expect("named import regex")
});
static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+\*\s+as\s+[\w$]+\s+from\s+['"]([^'"]+)['"]"#)
        .expect("namespace import regex")
});
static SIDE_EFFECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#).expect("side-effect import regex")
});
static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("require regex")
});
static REEXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"export\s+(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s+from\s+['"]([^'"]+)['"]"#)
        .expect("re-export regex")
});

/// Regex-family extraction for TypeScript-like source.
pub struct RegexExtractor;

impl ImportExtractor for RegexExtractor {
    fn extract(&self, content: &str) -> Vec<String> {
        let mut out = Vec::new();
        for re in [
            &*NAMED_RE,
            &*NAMESPACE_RE,
            &*SIDE_EFFECT_RE,
            &*REQUIRE_RE,
            &*REEXPORT_RE,
        ] {
            for caps in re.captures_iter(content) {
                if let Some(m) = caps.get(1) {
                    out.push(m.as_str().to_string());
                }
            }
        }
        out
    }
}

/// Picks the extraction strategy for a language.
#[must_use]
pub fn extractor_for(lang: Lang) -> Box<dyn ImportExtractor> {
    match lang {
        Lang::Python => Box::new(TreeSitterExtractor::new(Lang::Python)),
        Lang::TypeScript => Box::new(RegexExtractor),
    }
}

/// Reduces a raw specifier to a module name (top-level package or
/// first path segment under the source root).
///
/// - `./components/button` -> `components`
/// - `@/services/api` -> `services`
/// - `numpy.linalg` -> `numpy`
/// - `@scope/pkg/sub` -> `@scope/pkg`
#[must_use]
pub fn normalize_specifier(raw: &str) -> Option<String> {
    let spec = raw.trim();
    if spec.is_empty() {
        return None;
    }

    if let Some(rest) = spec.strip_prefix("@/") {
        return first_segment(rest);
    }

    if spec.starts_with('@') {
        // Scoped package: the module is the scope plus the package.
        let mut parts = spec.split('/');
        let scope = parts.next()?;
        let pkg = parts.next()?;
        return Some(format!("{scope}/{pkg}"));
    }

    if spec.starts_with('.') {
        let rest = spec.trim_start_matches(['.', '/']);
        return first_segment(rest);
    }

    first_segment(spec)
}

fn first_segment(spec: &str) -> Option<String> {
    let segment: String = spec
        .chars()
        .take_while(|c| *c != '/' && *c != '.')
        .collect();
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

/// Extracts the module-name projection of every import in the file.
/// Order is preserved; duplicates are removed.
#[must_use]
pub fn extract_modules(path: &Path, content: &str) -> Vec<String> {
    let Some(lang) = Lang::from_path(path) else {
        return Vec::new();
    };

    let raw = extractor_for(lang).extract(content);
    let mut seen = std::collections::HashSet::new();
    raw.iter()
        .filter_map(|spec| normalize_specifier(spec))
        .filter(|m| seen.insert(m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_python_imports() {
        let code = r"
import os
from sys import path
import numpy as np
from core.config import Settings
";
        let modules = extract_modules(Path::new("script.py"), code);
        assert!(modules.contains(&"os".to_string()));
        assert!(modules.contains(&"sys".to_string()));
        assert!(modules.contains(&"numpy".to_string()));
        assert!(modules.contains(&"core".to_string()));
    }

    #[test]
    fn test_ts_import_forms() {
        let code = r#"
import { Foo } from "./components/foo";
import * as utils from "../utils";
import "./styles.css";
const fs = require('fs');
export * from "@/services/api";
export { bar } from "lodash/fp";
"#;
        let modules = extract_modules(Path::new("app.ts"), code);
        assert!(modules.contains(&"components".to_string()));
        assert!(modules.contains(&"utils".to_string()));
        assert!(modules.contains(&"styles".to_string()));
        assert!(modules.contains(&"fs".to_string()));
        assert!(modules.contains(&"services".to_string()));
        assert!(modules.contains(&"lodash".to_string()));
    }

    #[test]
    fn test_normalize_specifier() {
        assert_eq!(normalize_specifier("./a/b"), Some("a".to_string()));
        assert_eq!(normalize_specifier("@/core/db"), Some("core".to_string()));
        assert_eq!(normalize_specifier("numpy.linalg"), Some("numpy".to_string()));
        assert_eq!(
            normalize_specifier("@scope/pkg/sub"),
            Some("@scope/pkg".to_string())
        );
        assert_eq!(normalize_specifier(""), None);
    }

    #[test]
    fn test_duplicates_removed() {
        let code = "import a from 'lib';\nimport b from 'lib';\n";
        let modules = extract_modules(Path::new("x.ts"), code);
        assert_eq!(modules, vec!["lib".to_string()]);
    }

    #[test]
    fn test_unsupported_extension_yields_nothing() {
        assert!(extract_modules(Path::new("main.go"), "import \"fmt\"").is_empty());
    }
}
