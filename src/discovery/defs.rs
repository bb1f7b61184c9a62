// src/discovery/defs.rs
//! Definition extraction for the discovery index.

use std::path::{Path, PathBuf};
use tree_sitter::{Language, Parser, Query, QueryCursor};

use crate::lang::Lang;

/// A function or class definition found in the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Definition {
    pub name: String,
    pub kind: DefKind,
    pub file: PathBuf,
    pub line: usize,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefKind {
    Function,
    Class,
}

impl DefKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
        }
    }

    fn from_node_kind(kind: &str) -> Self {
        match kind {
            "class_definition" | "class_declaration" => Self::Class,
            _ => Self::Function,
        }
    }
}

/// Extracts definitions from the given file content. Unparseable
/// content contributes no definitions.
#[must_use]
pub fn extract(path: &Path, content: &str) -> Vec<Definition> {
    let Some(lang) = Lang::from_path(path) else {
        return Vec::new();
    };

    let grammar = lang.grammar();
    let Ok(query) = Query::new(grammar, lang.q_defs()) else {
        return Vec::new();
    };

    run_extraction(path, content, grammar, &query)
}

fn run_extraction(path: &Path, source: &str, lang: Language, query: &Query) -> Vec<Definition> {
    let Some(tree) = parse_source(source, lang) else {
        return Vec::new();
    };
    // Unparseable content contributes no definitions.
    if tree.root_node().has_error() {
        return Vec::new();
    }

    let lines: Vec<&str> = source.lines().collect();
    let mut cursor = QueryCursor::new();
    let name_idx = query.capture_index_for_name("name").unwrap_or(0);
    let sig_idx = query.capture_index_for_name("sig").unwrap_or(0);

    cursor
        .matches(query, tree.root_node(), source.as_bytes())
        .filter_map(|m| build_def(&m, name_idx, sig_idx, path, source, &lines))
        .collect()
}

fn parse_source(source: &str, lang: Language) -> Option<tree_sitter::Tree> {
    let mut parser = Parser::new();
    parser.set_language(lang).ok()?;
    parser.parse(source, None)
}

fn build_def(
    m: &tree_sitter::QueryMatch,
    name_idx: u32,
    sig_idx: u32,
    path: &Path,
    source: &str,
    lines: &[&str],
) -> Option<Definition> {
    let (name, sig) = find_captures(m, name_idx, sig_idx, source)?;
    let row = sig.start_position().row;

    Some(Definition {
        name: name.to_string(),
        kind: DefKind::from_node_kind(sig.kind()),
        file: path.to_path_buf(),
        line: row + 1,
        signature: get_signature(lines, row),
    })
}

fn find_captures<'a>(
    m: &'a tree_sitter::QueryMatch,
    name_idx: u32,
    sig_idx: u32,
    source: &'a str,
) -> Option<(&'a str, tree_sitter::Node<'a>)> {
    let mut name = None;
    let mut sig = None;

    for c in m.captures {
        if c.index == name_idx {
            name = c.node.utf8_text(source.as_bytes()).ok();
        }
        if c.index == sig_idx {
            sig = Some(c.node);
        }
    }

    Some((name?, sig?))
}

fn get_signature(lines: &[&str], row: usize) -> String {
    lines
        .get(row)
        .map_or(String::new(), |l| l.trim().to_string())
}
