// src/sizing.rs
//! Project sizing and layer-stack recommendation, used by scaffolding.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::ArchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProjectSize {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl ProjectSize {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Enterprise => "enterprise",
        }
    }

    #[must_use]
    pub fn recommended_layer_count(self) -> usize {
        match self {
            Self::Small => 2,
            Self::Medium => 3,
            Self::Large => 4,
            Self::Enterprise => 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SizeReport {
    pub size: ProjectSize,
    pub file_count: usize,
    pub line_count: usize,
}

/// Classifies by file count and line count; the larger signal wins.
#[must_use]
pub fn classify(file_count: usize, line_count: usize) -> ProjectSize {
    let by_files = match file_count {
        0..=50 => ProjectSize::Small,
        51..=200 => ProjectSize::Medium,
        201..=1000 => ProjectSize::Large,
        _ => ProjectSize::Enterprise,
    };
    let by_lines = match line_count {
        0..=5_000 => ProjectSize::Small,
        5_001..=20_000 => ProjectSize::Medium,
        20_001..=100_000 => ProjectSize::Large,
        _ => ProjectSize::Enterprise,
    };
    by_files.max(by_lines)
}

/// Counts source files and lines under `root` and classifies.
#[must_use]
pub fn measure(root: &Path, config: &ArchConfig) -> SizeReport {
    let extensions = config.project.kind.source_extensions();
    let mut file_count = 0usize;
    let mut line_count = 0usize;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir()
                && matches!(
                    name.as_ref(),
                    ".git" | "node_modules" | "target" | "dist" | "build" | "__pycache__" | ".venv"
                ))
        })
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let Some(ext) = entry.path().extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !extensions.contains(&ext) {
            continue;
        }
        file_count += 1;
        if let Ok(content) = fs::read_to_string(entry.path()) {
            line_count += content.lines().count();
        }
    }

    SizeReport {
        size: classify(file_count, line_count),
        file_count,
        line_count,
    }
}

/// Fixed layer presets, 2 through 5 layers, most fundamental first.
#[must_use]
pub fn recommended_layers(size: ProjectSize) -> Vec<(&'static str, u32)> {
    let names: &[&str] = match size {
        ProjectSize::Small => &["core", "app"],
        ProjectSize::Medium => &["core", "services", "app"],
        ProjectSize::Large => &["core", "lib", "services", "app"],
        ProjectSize::Enterprise => &["core", "lib", "services", "interface", "app"],
    };
    names
        .iter()
        .enumerate()
        .map(|(tier, name)| (*name, u32::try_from(tier).unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project_is_small() {
        assert_eq!(classify(0, 0), ProjectSize::Small);
    }

    #[test]
    fn test_line_count_can_escalate() {
        assert_eq!(classify(10, 150_000), ProjectSize::Enterprise);
    }

    #[test]
    fn test_recommended_stack_sizes() {
        for size in [
            ProjectSize::Small,
            ProjectSize::Medium,
            ProjectSize::Large,
            ProjectSize::Enterprise,
        ] {
            assert_eq!(recommended_layers(size).len(), size.recommended_layer_count());
        }
    }

    #[test]
    fn test_tiers_ascend_from_zero() {
        let layers = recommended_layers(ProjectSize::Enterprise);
        for (i, (_, tier)) in layers.iter().enumerate() {
            assert_eq!(*tier as usize, i);
        }
    }
}
