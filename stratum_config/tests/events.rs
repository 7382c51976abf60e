//! Notifications fired by accessor and binding edits.

mod common;

use std::sync::{Arc, Mutex};

use common::boot;
use common::manifests::{framework, toggle_plugin};
use rstest::{fixture, rstest};
use serde_json::json;
use stratum_config::{ConfigEngine, SettingChanged, System};
use test_helpers::TempConfigDir;

#[fixture]
fn dir() -> TempConfigDir {
    TempConfigDir::new().expect("temp config dir")
}

#[derive(Default)]
struct Recorder {
    changes: Mutex<Vec<SettingChanged>>,
    keybinds: Mutex<usize>,
}

impl Recorder {
    fn attach(engine: &mut ConfigEngine) -> Arc<Self> {
        let recorder = Arc::new(Self::default());
        let changes = Arc::clone(&recorder);
        engine.on_setting_changed(move |change| {
            changes.changes.lock().expect("lock").push(change.clone());
        });
        let keybinds = Arc::clone(&recorder);
        engine.on_keybinds_modified(move || {
            *keybinds.keybinds.lock().expect("lock") += 1;
        });
        recorder
    }

    fn changes(&self) -> Vec<SettingChanged> {
        self.changes.lock().expect("lock").clone()
    }

    fn keybind_edits(&self) -> usize {
        *self.keybinds.lock().expect("lock")
    }
}

#[rstest]
fn binding_writes_report_the_owner(dir: TempConfigDir) {
    let (mut engine, _) = boot(
        &dir,
        &[
            ("framework", framework()),
            ("alpha", toggle_plugin("alpha", "F2")),
        ],
        &["alpha"],
    );
    let recorder = Recorder::attach(&mut engine);

    let replacement = json!({"type": "keyboard", "key": "F7"});
    assert!(engine.set_value("framework", "keybinds.alpha.toggle[0]", replacement.clone()));

    let changes = recorder.changes();
    assert_eq!(
        changes,
        [SettingChanged {
            system: System::Keybinds,
            component: "alpha".to_owned(),
            key_path: "alpha.toggle[0]".to_owned(),
            value: replacement,
        }]
    );
    assert_eq!(recorder.keybind_edits(), 1);
    assert!(engine.is_dirty("alpha"));
}

#[rstest]
fn binding_edits_fire_keybinds_modified_only(dir: TempConfigDir) {
    let (mut engine, _) = boot(
        &dir,
        &[
            ("framework", framework()),
            ("alpha", toggle_plugin("alpha", "F2")),
        ],
        &["alpha"],
    );
    let recorder = Recorder::attach(&mut engine);

    assert!(engine.update_binding("alpha.toggle", None, &json!({"key": "F3"}), None));
    let current = json!({"type": "keyboard", "key": "F3"});
    assert!(engine.update_binding_property("alpha.toggle", &current, "behavior", json!("hold")));
    assert!(engine.delete_binding("alpha.toggle", &current));
    assert!(!engine.update_binding("alpha.toggle", None, &json!({"key": "escape"}), None));

    assert_eq!(recorder.keybind_edits(), 3);
    assert!(recorder.changes().is_empty());
}

#[rstest]
fn rejected_writes_stay_silent(dir: TempConfigDir) {
    let (mut engine, _) = boot(&dir, &[("framework", framework())], &[]);
    engine.save_all_dirty();
    let recorder = Recorder::attach(&mut engine);

    assert!(!engine.set_value("framework", "ui.windows.main_window.is_visible", json!(1)));
    assert!(!engine.set_value("framework", "nowhere.at.all", json!(1)));
    assert!(!engine.set_value("framework", "keybinds.core.menu[0]", json!({"key": ""})));

    assert!(recorder.changes().is_empty());
    assert_eq!(recorder.keybind_edits(), 0);
    assert_eq!(engine.dirty_components().count(), 0);
}
