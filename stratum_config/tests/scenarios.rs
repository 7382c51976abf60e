//! End-to-end scenarios: defaults without user files, contested inputs,
//! soft reservation, rejected user values and binding deletion.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, ensure};
use common::manifests::{framework, toggle_plugin};
use common::{boot, engine_in};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use stratum_config::{
    ActionKey, Binding, ConfigEngine, InitializationReport, InputType, Manifest, Severity, System,
};
use test_helpers::TempConfigDir;

#[fixture]
fn dir() -> TempConfigDir {
    TempConfigDir::new().expect("temp config dir")
}

fn contested() -> Vec<(&'static str, Manifest)> {
    vec![
        ("framework", framework()),
        ("A", toggle_plugin("A", "F1")),
        ("B", toggle_plugin("B", "F1")),
    ]
}

fn keys_of(engine: &ConfigEngine, key: &ActionKey) -> Vec<String> {
    engine
        .shared()
        .bindings(key)
        .into_iter()
        .map(|binding| binding.key)
        .collect()
}

#[rstest]
fn framework_defaults_apply_without_user_file(dir: TempConfigDir) {
    let mut engine = engine_in(&dir);
    engine.register_plugin_manifest(
        "framework",
        Manifest::framework_default()
            .with_defaults(System::Logging, json!({"level": {"value": "info"}})),
    );
    let mut report = InitializationReport::new();
    engine.finalize(&mut report);
    engine.aggregate_isolated_system(System::Logging, &mut report);

    let tree = engine
        .component_config("framework", System::Logging)
        .expect("logging tree");
    assert_eq!(Value::from(tree), json!({"level": {"value": "info"}}));
    assert!(engine.is_dirty("framework"));
    assert_eq!(report.count(Severity::Warning), 0);
}

#[rstest]
fn first_enabled_plugin_keeps_contested_input(dir: TempConfigDir) {
    let (engine, report) = boot(&dir, &contested(), &["A", "B"]);

    let a = ActionKey::new("A", "toggle");
    let b = ActionKey::new("B", "toggle");
    assert_eq!(keys_of(&engine, &a), ["F1"]);
    assert!(engine.shared().bindings(&b).is_empty());
    assert_eq!(engine.ownership().get(&b).map(String::as_str), Some("B"));
    assert!(report.mentions_path("keybinds.B.toggle"));
    assert!(engine.is_dirty("B"));
}

#[rstest]
fn disabled_plugin_keeps_its_reservation(dir: TempConfigDir) {
    let (mut engine, _) = boot(&dir, &contested(), &["A", "B"]);
    let b = ActionKey::new("B", "toggle");

    let mut disable_report = InitializationReport::new();
    assert!(engine.set_component_enabled("B", false, &mut disable_report));
    assert!(disable_report.mentions_path("keybinds.B.toggle"));
    assert_eq!(engine.ownership().get(&b).map(String::as_str), Some("B"));
    assert!(engine.shared().action(&b).is_some());

    let mut enable_report = InitializationReport::new();
    assert!(engine.set_component_enabled("B", true, &mut enable_report));
    assert!(enable_report.mentions_path("keybinds.B.toggle"));
    assert!(engine.shared().bindings(&b).is_empty());
    assert_eq!(
        engine.action_for_input(&json!({"type": "keyboard", "key": "F1"})),
        Some(ActionKey::new("A", "toggle"))
    );
}

#[rstest]
fn enabled_plugin_user_file_beats_framework_defaults(dir: TempConfigDir) -> Result<()> {
    dir.write_json(
        "A",
        &json!({"keybinds": {"A": {"toggle": [{"type": "keyboard", "key": "F1"}]}}}),
    )?;
    let menu_key = Binding::new(InputType::Keyboard, "F1");
    let framework = Manifest::framework_default().with_binding("core", "menu", menu_key);
    let (engine, report) = boot(
        &dir,
        &[("framework", framework), ("A", toggle_plugin("A", "F9"))],
        &["A"],
    );

    let menu = ActionKey::new("core", "menu");
    assert_eq!(keys_of(&engine, &ActionKey::new("A", "toggle")), ["F1"]);
    ensure!(
        keys_of(&engine, &menu).is_empty(),
        "core.menu kept its default"
    );
    assert_eq!(
        engine.ownership().get(&menu).map(String::as_str),
        Some("framework")
    );
    ensure!(report.mentions_path("keybinds.core.menu"), "{report}");
    ensure!(engine.is_dirty("framework"));
    Ok(())
}

#[rstest]
fn disabled_plugin_user_file_yields_to_framework_defaults(dir: TempConfigDir) -> Result<()> {
    dir.write_json(
        "A",
        &json!({"keybinds": {"A": {"toggle": [{"type": "keyboard", "key": "F1"}]}}}),
    )?;
    let menu_key = Binding::new(InputType::Keyboard, "F1");
    let framework = Manifest::framework_default().with_binding("core", "menu", menu_key);
    let (engine, report) = boot(
        &dir,
        &[("framework", framework), ("A", toggle_plugin("A", "F9"))],
        &[],
    );

    assert_eq!(keys_of(&engine, &ActionKey::new("core", "menu")), ["F1"]);
    assert_eq!(keys_of(&engine, &ActionKey::new("A", "toggle")), ["F9"]);
    ensure!(report.mentions_path("keybinds.A.toggle"), "{report}");
    Ok(())
}

#[rstest]
fn mismatched_user_value_keeps_default(dir: TempConfigDir) -> Result<()> {
    dir.write_json(
        "framework",
        &json!({"ui": {"windows": {"main_window": {"is_visible": "yes"}}}}),
    )?;
    let (engine, report) = boot(&dir, &[("framework", framework())], &[]);
    let visible = "ui.windows.main_window.is_visible";

    let shown = engine.get_value("framework", visible, Value::Null);
    assert_eq!(shown, json!(true));
    assert!(report.mentions_path(visible));
    assert!(report.to_string().contains("framework"));
    assert!(engine.is_dirty("framework"));
    let node = engine
        .component_config("framework", System::Ui)
        .and_then(|tree| tree.get_path(&["windows", "main_window", "is_visible"]))
        .expect("visibility node");
    assert_eq!(
        node.meta().and_then(|meta| meta.title.as_deref()),
        Some("ui.main_window.visible")
    );
    Ok(())
}

#[rstest]
fn deleting_the_only_binding_empties_the_action(dir: TempConfigDir) {
    let (mut engine, _) = boot(&dir, &contested(), &["A", "B"]);
    engine.save_all_dirty();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    engine.on_keybinds_modified(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    assert!(engine.delete_binding("A.toggle", &json!({"type": "keyboard", "key": "F1"})));

    let a = ActionKey::new("A", "toggle");
    assert!(engine.shared().bindings(&a).is_empty());
    assert!(engine.shared().action(&a).is_some());
    assert_eq!(fired.load(Ordering::Relaxed), 1);
    assert!(engine.is_dirty("A"));
    assert!(!engine.delete_binding("A.toggle", &json!({"type": "keyboard", "key": "F1"})));
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}
