//! Manifests used across integration tests.

use serde_json::json;
use stratum_config::{Binding, InputType, Manifest, MetadataEntry, System};

/// Framework manifest with logging, UI and one keybind default.
pub fn framework() -> Manifest {
    Manifest::framework_default()
        .with_defaults(System::Logging, json!({"level": {"value": "info"}}))
        .with_defaults(
            System::Ui,
            json!({
                "windows": {
                    "main_window": {
                        "is_visible": {"value": true, "meta": {"title": "ui.main_window.visible"}},
                        "opacity": 0.9
                    }
                }
            }),
        )
        .with_binding("core", "menu", Binding::new(InputType::Keyboard, "Escape"))
}

/// Plugin `name` declaring `<name>.toggle` on keyboard `key`.
pub fn toggle_plugin(name: &str, key: &str) -> Manifest {
    Manifest::new()
        .with_defaults(System::Settings, json!({"interval": 5}))
        .with_binding(name, "toggle", Binding::new(InputType::Keyboard, key))
        .with_metadata(
            System::Keybinds,
            MetadataEntry::titled(
                format!("{name}.toggle"),
                format!("{name}.toggle.title"),
                format!("{name}.toggle.description"),
            ),
        )
}
