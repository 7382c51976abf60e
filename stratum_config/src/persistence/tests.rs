//! Unit tests for user file IO, layout resolution and dirty tracking.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::TempConfigDir;

use super::{
    CONFIG_DIR_ENV, DirtyTracker, EngineOptions, SaveFailure, SaveSummary, UserFile,
    UserFileLayout,
};
use crate::{StratumError, System};

#[fixture]
fn config_dir() -> TempConfigDir {
    TempConfigDir::new().expect("temp config dir")
}

fn layout_for(dir: &TempConfigDir) -> UserFileLayout {
    UserFileLayout::new(dir.path())
}

#[rstest]
fn missing_file_loads_as_missing(config_dir: TempConfigDir) {
    assert!(layout_for(&config_dir).load("framework").is_missing());
}

#[test]
fn missing_directory_loads_as_missing() {
    let layout = UserFileLayout::new("/nonexistent/stratum/config");
    assert!(layout.load("framework").is_missing());
}

#[rstest]
#[case::garbage("{not json")]
#[case::not_object("[1, 2, 3]")]
#[case::empty("")]
fn unparsable_file_loads_as_corrupt(config_dir: TempConfigDir, #[case] content: &str) {
    config_dir.write_raw("plugin", content).expect("write raw");
    let loaded = layout_for(&config_dir).load("plugin");
    assert!(loaded.is_corrupt());
    let UserFile::Corrupt(err) = &loaded else {
        panic!("expected a corrupt file");
    };
    assert!(matches!(**err, StratumError::Parse { .. }));
}

#[rstest]
fn loaded_file_exposes_sections(config_dir: TempConfigDir) {
    config_dir
        .write_json("framework", &json!({"logging": {"level": "debug"}}))
        .expect("write json");
    let loaded = layout_for(&config_dir).load("framework");
    assert_eq!(
        loaded.section(System::Logging),
        Some(&json!({"level": "debug"}))
    );
    assert!(loaded.section(System::Ui).is_none());
}

#[rstest]
fn write_creates_directory_and_replaces_content(config_dir: TempConfigDir) {
    let nested = config_dir.path().join("nested/deeper");
    let layout = UserFileLayout::new(nested.clone());
    layout
        .write("A", &json!({"ui": {"scale": 2}, "stale": true}))
        .expect("first write");
    let path = layout
        .write("A", &json!({"ui": {"scale": 3}}))
        .expect("second write");
    assert_eq!(path, nested.join("A.json"));
    let reloaded = layout.load("A").into_document();
    assert_eq!(
        serde_json::Value::Object(reloaded),
        json!({"ui": {"scale": 3}})
    );
}

#[test]
fn explicit_dir_wins_over_environment() {
    let options = EngineOptions::new().with_config_dir("/explicit");
    let resolved = options.resolve_config_dir_with(|_| Some("/from/env".to_owned()));
    assert_eq!(resolved, Utf8PathBuf::from("/explicit"));
}

#[rstest]
#[case::override_var(CONFIG_DIR_ENV, "/override", "/override")]
#[case::xdg("XDG_CONFIG_HOME", "/home/me/.config", "/home/me/.config/demo")]
fn environment_resolution(#[case] var: &str, #[case] value: &str, #[case] expected: &str) {
    let options = EngineOptions::new().with_app_name("demo");
    let resolved =
        options.resolve_config_dir_with(|key| (key == var).then(|| value.to_owned()));
    assert_eq!(resolved, Utf8PathBuf::from(expected));
}

#[test]
fn blank_environment_values_are_ignored() {
    let options = EngineOptions::new().with_app_name("demo");
    let resolved = options.resolve_config_dir_with(|key| {
        (key == CONFIG_DIR_ENV).then(|| "  ".to_owned())
    });
    assert_ne!(resolved, Utf8PathBuf::from("  "));
}

#[test]
fn layout_honours_extension() {
    let layout = EngineOptions::new()
        .with_config_dir("/cfg")
        .with_file_extension("conf")
        .layout();
    assert_eq!(layout.path_for("A").as_str(), "/cfg/A.conf");
}

#[test]
fn tracker_records_dirty_and_corrupted() {
    let mut tracker = DirtyTracker::new();
    assert!(tracker.mark("B"));
    assert!(!tracker.mark("B"));
    tracker.mark("A");
    assert_eq!(tracker.components().collect::<Vec<_>>(), ["A", "B"]);
    let path = Utf8PathBuf::from("/cfg/B.json");
    tracker.mark_corrupted(&path);
    assert!(tracker.is_corrupted(&path));
    tracker.clear();
    assert!(tracker.is_empty());
    assert!(
        tracker.is_corrupted(&path),
        "clearing dirty keeps corrupted marks"
    );
    tracker.clear_corrupted(&path);
    assert_eq!(tracker.corrupted().count(), 0);
}

#[test]
fn summary_folds_failures() {
    let mut summary = SaveSummary::default();
    assert!(summary.is_success());
    assert!(summary.error().is_none());
    summary.failures.push(SaveFailure {
        component: "A".to_owned(),
        error: StratumError::invalid_binding("boom"),
    });
    summary.failures.push(SaveFailure {
        component: "B".to_owned(),
        error: Arc::new(StratumError::UnknownSystem("x".to_owned())),
    });
    assert!(matches!(summary.error(), Some(StratumError::Aggregate(agg)) if agg.len() == 2));
}
