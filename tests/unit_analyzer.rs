// tests/unit_analyzer.rs
//! End-to-end analyzer scenarios over temporary project trees.

use std::fs;
use std::path::Path;

use archguard_core::config::ArchConfig;
use archguard_core::graph::{DependencyAnalyzer, DependencyChain};
use archguard_core::layers::LayerTable;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn three_layer_config() -> ArchConfig {
    ArchConfig::parse(
        r#"{
        "project": {"type": "python"},
        "arch": {"layers": {
            "core": {"tier": 0, "patterns": ["src/core/**"]},
            "lib": {"tier": 1, "patterns": ["src/lib/**"]},
            "app": {"tier": 2, "patterns": ["src/app/**"]}
        }}
    }"#,
    )
    .unwrap()
}

#[test]
fn test_direct_violation_detected() {
    let dir = TempDir::new().unwrap();
    let config = ArchConfig::parse(
        r#"{
        "project": {"type": "python"},
        "arch": {"layers": {
            "core": {"tier": 0, "patterns": ["src/core/**"]},
            "lib": {"tier": 1, "patterns": ["src/lib/**"]}
        }}
    }"#,
    )
    .unwrap();
    write(dir.path(), "src/core/a.py", "import lib\n");
    write(dir.path(), "src/lib/b.py", "import os\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert_eq!(report.direct_violations.len(), 1);
    let v = &report.direct_violations[0];
    assert_eq!(v.source, "src/core/a.py");
    assert_eq!(v.target, "lib");
    assert_eq!(v.source_tier, Some(0));
    assert_eq!(v.target_tier, Some(1));
}

#[test]
fn test_equal_tier_layers_do_not_violate() {
    let dir = TempDir::new().unwrap();
    let config = ArchConfig::parse(
        r#"{
        "project": {"type": "python"},
        "arch": {"layers": {
            "domain": {"tier": 1, "patterns": ["src/domain/**"]},
            "adapters": {"tier": 1, "patterns": ["src/adapters/**"]}
        }}
    }"#,
    )
    .unwrap();
    write(dir.path(), "src/domain/model.py", "import adapters\n");
    write(dir.path(), "src/adapters/db.py", "import sqlite3\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert!(report.direct_violations.is_empty());
}

#[test]
fn test_transitive_chains_and_escalation() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();

    // Downward: app -> lib -> core is healthy.
    write(dir.path(), "src/app/main.py", "import lib\n");
    write(dir.path(), "src/lib/util.py", "import core\n");
    write(dir.path(), "src/core/base.py", "import os\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert!(report.chains.contains(&DependencyChain {
        from: "app".to_string(),
        via: "lib".to_string(),
        to: "core".to_string(),
    }));
    assert!(report.transitive_violations.is_empty());
}

#[test]
fn test_transitive_escalation_flagged() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();

    // core -> lib is already a direct violation; lib -> app hands core
    // effective access to app.
    write(dir.path(), "src/core/base.py", "import lib\n");
    write(dir.path(), "src/lib/util.py", "import app\n");
    write(dir.path(), "src/app/main.py", "import os\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert!(!report.direct_violations.is_empty());
    assert_eq!(report.transitive_violations.len(), 1);
    let v = &report.transitive_violations[0];
    assert_eq!((v.source.as_str(), v.target.as_str()), ("core", "app"));
    assert!(v.message.contains("via lib"));
}

#[test]
fn test_empty_project() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();
    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert_eq!(report.stats.files_scanned, 0);
    assert!(report.direct_violations.is_empty());
    assert!(report.file_graph.is_empty());
}

#[test]
fn test_layer_with_zero_files_present_in_layer_deps() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();
    write(dir.path(), "src/core/base.py", "import os\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert_eq!(report.layer_deps.get("app"), Some(&std::collections::BTreeSet::new()));
    assert_eq!(report.stats.per_layer.get("app"), Some(&0));
}

#[test]
fn test_own_layer_import_is_not_violation() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();
    write(dir.path(), "src/core/a.py", "import core\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());
    assert!(report.direct_violations.is_empty());
}

#[test]
fn test_unlayered_files_stay_in_graph_ungraded() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();
    write(dir.path(), "scripts/tool.py", "import lib\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    assert!(report.file_graph.contains_key("scripts/tool.py"));
    assert!(report.direct_violations.is_empty());
}

#[test]
fn test_excluded_directories_skipped() {
    let dir = TempDir::new().unwrap();
    let mut config = three_layer_config();
    config.arch.exclude_dirs = vec!["vendor".to_string()];
    write(dir.path(), "vendor/src/core/x.py", "import lib\n");
    write(dir.path(), "node_modules/pkg/index.py", "import lib\n");

    let table = LayerTable::load(&config).unwrap();
    let report = DependencyAnalyzer::new(&config, &table).analyze(dir.path());
    assert!(report.file_graph.is_empty());
}

#[test]
fn test_traversal_order_is_stable() {
    let dir = TempDir::new().unwrap();
    let config = three_layer_config();
    write(dir.path(), "src/core/b.py", "import lib\n");
    write(dir.path(), "src/core/a.py", "import lib\n");
    write(dir.path(), "src/lib/x.py", "import os\n");

    let table = LayerTable::load(&config).unwrap();
    let first = DependencyAnalyzer::new(&config, &table).analyze(dir.path());
    let second = DependencyAnalyzer::new(&config, &table).analyze(dir.path());

    let sources = |r: &archguard_core::graph::DependencyReport| {
        r.direct_violations.iter().map(|v| v.source.clone()).collect::<Vec<_>>()
    };
    assert_eq!(sources(&first), sources(&second));
    assert_eq!(sources(&first), vec!["src/core/a.py", "src/core/b.py"]);
}
