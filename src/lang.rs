use std::path::Path;
use tree_sitter::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Python,
    TypeScript,
}

#[derive(Debug, Clone, Copy)]
pub enum QueryKind {
    Imports,
    Defs,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Self::Python),
            "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Self::TypeScript),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_ext)
    }

    #[must_use]
    pub fn grammar(self) -> Language {
        match self {
            Self::Python => tree_sitter_python::language(),
            Self::TypeScript => tree_sitter_typescript::language_typescript(),
        }
    }

    // Indexing is safe: lang_idx and query_idx are bounded by enum variant count
    // which matches the QUERIES array dimensions exactly
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn query(self, kind: QueryKind) -> &'static str {
        let lang_idx = self as usize;
        let query_idx = kind as usize;
        QUERIES[lang_idx][query_idx]
    }

    #[must_use]
    pub fn q_imports(self) -> &'static str {
        self.query(QueryKind::Imports)
    }
    #[must_use]
    pub fn q_defs(self) -> &'static str {
        self.query(QueryKind::Defs)
    }
}

// [Python, TypeScript] x [Imports, Defs]
const QUERIES: [[&str; 2]; 2] = [
    // Python
    [
        r"
            (import_statement name: (dotted_name) @import)
            (aliased_import name: (dotted_name) @import)
            (import_from_statement module_name: (dotted_name) @import)
            (import_from_statement module_name: (relative_import) @import)
        ", // Imports
        r"
            (function_definition name: (identifier) @name) @sig
            (class_definition name: (identifier) @name) @sig
        ", // Defs
    ],
    // TypeScript
    [
        r"
            (import_statement source: (string) @import)
            (export_statement source: (string) @import)
        ", // Imports
        r"
            (function_declaration name: (identifier) @name) @sig
            (class_declaration name: (type_identifier) @name) @sig
            (method_definition name: (property_identifier) @name) @sig
        ", // Defs
    ],
];
