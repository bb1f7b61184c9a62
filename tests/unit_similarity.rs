// tests/unit_similarity.rs
//! Tests for the discovery index and the name similarity metric.

use std::fs;
use std::path::Path;

use archguard_core::config::ArchConfig;
use archguard_core::discovery::{DiscoveryIndex, NameSimilarity, Similarity};
use tempfile::TempDir;

fn python_config() -> ArchConfig {
    ArchConfig::parse(r#"{"project": {"type": "python"}}"#).unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_exact_duplicate_scores_one() {
    let scorer = NameSimilarity::default();
    assert!((scorer.score("process_data", "process_data") - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_word_overlap_example() {
    // Jaccard({process, data}, {process, item}) * 0.7 = (1/3) * 0.7
    let scorer = NameSimilarity::default();
    let score = scorer.score("process_data", "process_item");
    assert!(score > 0.0 && score < 1.0);
    assert!((score - 0.7 / 3.0).abs() < 1e-9);
}

#[test]
fn test_index_finds_near_duplicate() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/pipeline/transform.py",
        "def process_data(x: int) -> str:\n    return str(x)\n",
    );

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);
    assert_eq!(index.definitions().len(), 1);

    let matches = index.find_similar(
        Path::new("src/pipeline/new.py"),
        "def process_data(x: int) -> str:\n    return repr(x)\n",
        0.7,
        None,
    );
    assert_eq!(matches.len(), 1);
    assert!((matches[0].score - 1.0).abs() < f64::EPSILON);
    assert_eq!(matches[0].existing.name, "process_data");
    assert!(matches[0].existing.signature.contains("x: int"));
}

#[test]
fn test_threshold_boundary_inclusive() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/a.py", "def process_data(x):\n    pass\n");

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);

    // Case-insensitive match scores exactly 0.95.
    let at_threshold = index.find_similar(
        Path::new("src/b.py"),
        "def PROCESS_DATA(x):\n    pass\n",
        0.95,
        None,
    );
    assert_eq!(at_threshold.len(), 1, "exactly-threshold matches are returned");

    let above_threshold = index.find_similar(
        Path::new("src/b.py"),
        "def PROCESS_DATA(x):\n    pass\n",
        0.951,
        None,
    );
    assert!(above_threshold.is_empty(), "below-threshold matches are not");
}

#[test]
fn test_exclude_file_removes_self_matches() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/util.py", "def helper_fn(a):\n    pass\n");

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);
    let matches = index.find_similar(
        Path::new("src/util.py"),
        "def helper_fn(a):\n    pass\n",
        0.7,
        Some(Path::new("src/util.py")),
    );
    assert!(matches.is_empty());
}

#[test]
fn test_kinds_do_not_cross_match() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/models.py", "class Processor:\n    pass\n");

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);
    let matches = index.find_similar(
        Path::new("src/new.py"),
        "def processor():\n    pass\n",
        0.5,
        None,
    );
    assert!(matches.is_empty(), "function vs class must not match");
}

#[test]
fn test_unparseable_existing_file_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/ok.py", "def fine():\n    pass\n");
    write(dir.path(), "src/broken.py", "def broken(:\n");

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);
    assert!(index.definitions().iter().all(|d| d.name != "broken"));
}

#[test]
fn test_matches_sorted_descending() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "src/a.py",
        "def process_data(x):\n    pass\n\ndef process_item(x):\n    pass\n",
    );

    let config = python_config();
    let index = DiscoveryIndex::build(dir.path(), &config);
    let matches = index.find_similar(
        Path::new("src/b.py"),
        "def process_data(x):\n    pass\n",
        0.1,
        None,
    );
    assert!(matches.len() >= 2);
    for pair in matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
