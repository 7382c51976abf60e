//! Unit tests for manifests, the store and per-system views.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::{FRAMEWORK, Manifest, ManifestStore, MetadataEntry, default_bindings, manifest_view};
use crate::{ActionKey, Binding, InputType, Node, System};

#[fixture]
fn toggle_manifest() -> Manifest {
    Manifest::new()
        .with_binding("A", "toggle", Binding::new(InputType::Keyboard, "F1"))
        .with_metadata(
            System::Keybinds,
            MetadataEntry::titled("A.toggle", "a.toggle.title", "a.toggle.desc"),
        )
}

#[test]
fn deserializes_full_manifest() {
    let manifest = Manifest::from_json(json!({
        "info": {
            "name": "Minimap",
            "version": "1.2.0",
            "description": "minimap.description",
            "links": {"homepage": "https://example.invalid/minimap"}
        },
        "config": {
            "allow_user_config": true,
            "user_configurable": ["ui", "keybinds"],
            "required_capabilities": ["render"]
        },
        "ui": {"opacity": 0.8},
        "keybinds": {"Minimap": {"toggle": [{"type": "keyboard", "key": "M"}]}},
        "metadata": {"ui": [{"path": "opacity", "title": "minimap.opacity"}]}
    }))
    .expect("manifest");
    assert!(manifest.info.has_description());
    assert!(manifest.config.has_settings());
    assert!(manifest.config.exposes(System::Keybinds));
    assert!(!manifest.config.exposes(System::Logging));
    assert_eq!(manifest.metadata.for_system(System::Ui).len(), 1);
    assert!(manifest.declares(System::Keybinds));
}

#[test]
fn policy_defaults_allow_user_config() {
    let manifest = Manifest::from_json(json!({})).expect("empty manifest");
    assert!(manifest.config.allow_user_config);
    assert!(!manifest.config.has_settings());
    assert!(manifest.info.is_empty());
}

#[test]
fn rejects_invalid_binding_in_manifest() {
    let raw = json!({"keybinds": {"A": {"toggle": [{"type": "pedal", "key": "1"}]}}});
    assert!(Manifest::from_json(raw).is_err());
}

#[rstest]
#[case::missing(None, false)]
#[case::null(Some(Value::Null), false)]
#[case::empty_object(Some(json!({})), false)]
#[case::populated(Some(json!({"level": "info"})), true)]
fn declares_only_real_content(#[case] defaults: Option<Value>, #[case] expected: bool) {
    let mut manifest = Manifest::new();
    manifest.logging = defaults;
    assert_eq!(manifest.declares(System::Logging), expected);
    assert_eq!(
        manifest_view(&manifest, System::Logging).is_some(),
        expected
    );
}

#[test]
fn metadata_wraps_plain_defaults() {
    let manifest = Manifest::new()
        .with_defaults(
            System::Ui,
            json!({"windows": {"main_window": {"is_visible": true}}}),
        )
        .with_metadata(
            System::Ui,
            MetadataEntry::titled(
                "windows.main_window.is_visible",
                "ui.visible",
                "ui.visible.desc",
            ),
        );
    let view = manifest_view(&manifest, System::Ui).expect("ui view");
    let node = view
        .get_path(&["windows", "main_window", "is_visible"])
        .expect("is_visible");
    assert!(node.is_annotated());
    assert_eq!(node.as_bool(), Some(true));
    assert_eq!(
        node.meta().and_then(|meta| meta.title.as_deref()),
        Some("ui.visible")
    );
}

#[test]
fn declared_meta_wins_over_metadata_entry() {
    let manifest = Manifest::new()
        .with_defaults(
            System::Settings,
            json!({"volume": {"value": 5, "meta": {"title": "inline.title"}}}),
        )
        .with_metadata(
            System::Settings,
            MetadataEntry::titled("volume", "list.title", "list.desc"),
        );
    let view = manifest_view(&manifest, System::Settings).expect("settings view");
    let meta = view.get("volume").and_then(Node::meta).expect("meta");
    assert_eq!(meta.title.as_deref(), Some("inline.title"));
    assert_eq!(meta.description.as_deref(), Some("list.desc"));
}

#[test]
fn metadata_for_missing_path_is_ignored() {
    let manifest = Manifest::new()
        .with_defaults(System::Logging, json!({"level": "info"}))
        .with_metadata(System::Logging, MetadataEntry::titled("sinks", "t", "d"));
    let view = manifest_view(&manifest, System::Logging).expect("logging view");
    assert_eq!(Value::from(&view), json!({"level": "info"}));
}

#[rstest]
fn keybinds_view_annotates_actions(toggle_manifest: Manifest) {
    let view = manifest_view(&toggle_manifest, System::Keybinds).expect("keybinds view");
    let action = view.get_path(&["A", "toggle"]).expect("action");
    assert!(action.is_annotated());
    let bindings = action.as_array().expect("bindings");
    assert_eq!(bindings.len(), 1);
    let binding = bindings
        .first()
        .map(Binding::from_node)
        .expect("first binding")
        .expect("valid binding");
    assert_eq!(binding.key, "F1");
}

#[rstest]
fn finds_default_bindings(toggle_manifest: Manifest) {
    let key = ActionKey::new("A", "toggle");
    assert_eq!(
        default_bindings(&toggle_manifest, &key).map(<[_]>::len),
        Some(1)
    );
    assert!(default_bindings(&toggle_manifest, &ActionKey::new("A", "other")).is_none());
}

#[rstest]
fn store_orders_framework_first(toggle_manifest: Manifest) {
    let mut store = ManifestStore::new();
    store.register("zeta", Manifest::new());
    store.register("A", toggle_manifest.clone());
    assert!(store.ensure_framework());
    assert!(!store.ensure_framework());
    let names: Vec<&str> = store.names().collect();
    assert_eq!(names, [FRAMEWORK, "A", "zeta"]);
    store.register("zeta", toggle_manifest);
    assert_eq!(
        store.declarers(&ActionKey::new("A", "toggle")),
        ["A", "zeta"]
    );
}

#[test]
fn framework_cannot_be_unregistered() {
    let mut store = ManifestStore::new();
    store.ensure_framework();
    store.register("plugin", Manifest::new());
    assert!(store.unregister(FRAMEWORK).is_none());
    assert!(store.unregister("plugin").is_some());
    assert_eq!(store.len(), 1);
}

#[test]
fn framework_default_declares_state_maps() {
    let manifest = Manifest::framework_default();
    let view = manifest_view(&manifest, System::Settings).expect("settings view");
    let states = view.get("plugin_states");
    assert!(states.is_some_and(|node| node.as_object().is_some()));
    assert!(view.get("hook_states").is_some());
    assert!(manifest.config.exposes(System::Settings));
}
