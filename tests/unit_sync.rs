// tests/unit_sync.rs
//! Tests for the template-driven sync engine and drift detection.

use std::fs;
use std::path::Path;

use archguard_core::config::ArchConfig;
use archguard_core::sync::{SyncEngine, SyncStatus};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn linter_setup() -> (TempDir, TempDir, ArchConfig) {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();

    write(
        plugin.path(),
        "templates/linters/ruff.toml",
        "line-length = {{style.line_length}}\ntarget-version = \"{{style.python_target}}\"\n",
    );
    write(
        plugin.path(),
        "presets/common.json",
        r#"{"style": {"line_length": 100, "python_target": "py311"}}"#,
    );

    let config = ArchConfig::parse(
        r#"{
        "project": {"type": "python", "name": "demo"},
        "managed": {
            "linters": {
                "ruff.toml": {"template": "templates/linters/ruff.toml"}
            }
        }
    }"#,
    )
    .unwrap();

    (project, plugin, config)
}

#[test]
fn test_sync_generates_and_round_trips_in_sync() {
    let (project, plugin, config) = linter_setup();
    let engine = SyncEngine::new(&config, project.path(), plugin.path());

    let results = engine.sync_all();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, SyncStatus::Generated);
    assert!(results[0].ok);

    let on_disk = fs::read_to_string(project.path().join("ruff.toml")).unwrap();
    assert!(on_disk.contains("line-length = 100"));
    assert!(on_disk.contains("target-version = \"py311\""));

    // Round-trip law: a sync pass followed by a status check is in sync.
    let statuses = engine.status_all();
    assert_eq!(statuses[0].status, SyncStatus::InSync);
}

#[test]
fn test_drift_states() {
    let (project, plugin, config) = linter_setup();
    let engine = SyncEngine::new(&config, project.path(), plugin.path());

    assert_eq!(engine.status_all()[0].status, SyncStatus::Missing);

    let _ = engine.sync_all();
    assert_eq!(engine.status_all()[0].status, SyncStatus::InSync);

    write(project.path(), "ruff.toml", "line-length = 80\n");
    assert_eq!(engine.status_all()[0].status, SyncStatus::Outdated);
}

#[test]
fn test_disabled_entry_untouched() {
    let (project, plugin, mut config) = linter_setup();
    config
        .managed
        .get_mut("linters")
        .unwrap()
        .get_mut("ruff.toml")
        .unwrap()
        .enabled = false;

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let results = engine.sync_all();
    assert_eq!(results[0].status, SyncStatus::Disabled);
    assert!(results[0].ok);
    assert!(!project.path().join("ruff.toml").exists());
}

#[test]
fn test_missing_template_records_error_and_continues() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write(plugin.path(), "templates/ok.txt", "fine\n");

    let config = ArchConfig::parse(
        r#"{"managed": {
            "config": {
                "a.txt": {"template": "templates/missing.txt"},
                "b.txt": {"template": "templates/ok.txt"}
            }
        }}"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let results = engine.sync_all();
    assert_eq!(results.len(), 2);

    let failed = results.iter().find(|r| r.path == "a.txt").unwrap();
    assert!(matches!(failed.status, SyncStatus::Error(_)));
    let succeeded = results.iter().find(|r| r.path == "b.txt").unwrap();
    assert_eq!(succeeded.status, SyncStatus::Generated);
}

#[test]
fn test_ignore_list_concatenation_with_section_headers() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write(plugin.path(), "templates/ignore/common.txt", "*.log\n.DS_Store\n");
    write(plugin.path(), "templates/ignore/node.txt", "node_modules/\ndist/\n");

    let config = ArchConfig::parse(
        r#"{
        "project": {"type": "node"},
        "managed": {
            "ignore": {
                ".gitignore": {"template": ["templates/ignore/common.txt", "templates/ignore/node.txt"]}
            }
        }
    }"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let results = engine.sync_all();
    assert_eq!(results[0].status, SyncStatus::Generated);

    let content = fs::read_to_string(project.path().join(".gitignore")).unwrap();
    assert!(content.starts_with("*.log\n"), "common base has no header");
    assert!(content.contains("# --- node ---\nnode_modules/\n"));
    assert_eq!(engine.status_all()[0].status, SyncStatus::InSync);
}

#[test]
fn test_duplicate_output_paths_rejected() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();

    let config = ArchConfig::parse(
        r#"{"managed": {
            "config": {"shared.txt": {"template": "a.txt"}},
            "docs": {"shared.txt": {"template": "b.txt"}}
        }}"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    assert!(engine.entries().is_err());
}

#[test]
fn test_claude_md_auto_region_regenerated_custom_preserved() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write(plugin.path(), "templates/docs/claude.md", "Project: {{project.name}}");

    write(
        project.path(),
        "CLAUDE.md",
        "# Head\n<!-- AUTO:START -->\nold\n<!-- AUTO:END -->\n<!-- CUSTOM:START -->\nMINE\n<!-- CUSTOM:END -->\nfoot",
    );

    let config = ArchConfig::parse(
        r#"{
        "project": {"name": "demo"},
        "managed": {
            "docs": {
                "CLAUDE.md": {"template": "templates/docs/claude.md", "type": "claude-md"}
            }
        }
    }"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let results = engine.sync_all();
    assert_eq!(results[0].status, SyncStatus::Generated);

    let content = fs::read_to_string(project.path().join("CLAUDE.md")).unwrap();
    assert!(content.contains("Project: demo"));
    assert!(!content.contains("old"));
    assert!(content.contains("MINE"));
    assert!(content.ends_with("foot"));
    assert!(content.starts_with("# Head\n"));

    // The regenerated document reads as in sync afterwards.
    assert_eq!(engine.status_all()[0].status, SyncStatus::InSync);
}

#[test]
fn test_claude_md_without_markers_gets_skeleton() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write(plugin.path(), "templates/docs/claude.md", "Generated body");

    let config = ArchConfig::parse(
        r#"{
        "project": {"name": "demo"},
        "managed": {
            "docs": {"CLAUDE.md": {"template": "templates/docs/claude.md"}}
        }
    }"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let _ = engine.sync_all();

    let content = fs::read_to_string(project.path().join("CLAUDE.md")).unwrap();
    assert!(content.contains("<!-- AUTO:START -->"));
    assert!(content.contains("Generated body"));
    assert!(content.contains("add your documentation here"));
}

#[test]
fn test_user_values_override_presets() {
    let project = TempDir::new().unwrap();
    let plugin = TempDir::new().unwrap();
    write(plugin.path(), "templates/linters/ruff.toml", "line-length = {{style.line_length}}\n");
    write(plugin.path(), "presets/common.json", r#"{"style": {"line_length": 100}}"#);

    let config = ArchConfig::parse(
        r#"{
        "values": {"style": {"line_length": 120}},
        "managed": {
            "linters": {"ruff.toml": {"template": "templates/linters/ruff.toml"}}
        }
    }"#,
    )
    .unwrap();

    let engine = SyncEngine::new(&config, project.path(), plugin.path());
    let _ = engine.sync_all();
    let content = fs::read_to_string(project.path().join("ruff.toml")).unwrap();
    assert!(content.contains("line-length = 120"));
}
