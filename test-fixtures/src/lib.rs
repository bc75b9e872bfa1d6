//! Test fixture loader and in-memory collaborators for equivalence engine tests.
//!
//! Provides typed deserialization of the scenario JSON files, plus simple
//! stores standing in for content storage, search, schedules, summaries,
//! progress, and message transport.

mod collaborators;
mod scenarios;

pub use collaborators::{
    InMemoryContentStore, InMemoryProgressStore, InMemorySummaryStore, RecordingMessageSender,
};
pub use scenarios::{CandidateFixture, CatalogueFixture, ExtractionScenario};

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("scenarios").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    files.sort();
    files
}

/// Load every extraction scenario in `scenarios/extraction`.
pub fn extraction_scenarios() -> Vec<ExtractionScenario> {
    list_fixtures("scenarios/extraction")
        .iter()
        .map(|path| {
            let rel = path
                .strip_prefix(fixtures_root())
                .unwrap_or_else(|e| panic!("fixture outside root {}: {}", path.display(), e));
            load_fixture(&rel.to_string_lossy())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().exists(), "test-fixtures directory not found");
    }

    #[test]
    fn all_extraction_scenarios_exist() {
        let files = [
            "scenarios/extraction/a_threshold.json",
            "scenarios/extraction/b_runner_up_too_close.json",
            "scenarios/extraction/c_clear_winner.json",
            "scenarios/extraction/d_remove_and_combine.json",
        ];
        for f in &files {
            assert!(fixture_exists(f), "Missing fixture: {}", f);
        }
    }

    #[test]
    fn extraction_scenarios_parse() {
        let scenarios = extraction_scenarios();
        assert_eq!(scenarios.len(), 4);
        assert!(scenarios.iter().all(|s| !s.pool.is_empty()));
    }

    #[test]
    fn catalogue_fixture_parses() {
        let catalogue: CatalogueFixture = load_fixture("scenarios/content/brand_catalogue.json");
        assert!(!catalogue.content.is_empty());
        let store = catalogue.into_store();
        assert!(!store.is_empty());
    }
}
