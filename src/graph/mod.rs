// src/graph/mod.rs
//! Project dependency graphing: import extraction, the file/layer
//! graphs, and transitive escalation detection.

pub mod analyzer;
pub mod imports;
pub mod transitive;

pub use analyzer::{AnalysisStats, DependencyAnalyzer, DependencyChain, DependencyReport};
pub use imports::{extract_modules, extractor_for, normalize_specifier, ImportExtractor};
