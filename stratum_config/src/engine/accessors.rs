//! Path-addressed reads, writes and resets.

use serde_json::Value;
use tracing::debug;

use super::ConfigEngine;
use crate::{
    ActionKey, Binding, ConfigPath, InitializationReport, Node, SettingChanged, System,
    default_bindings, manifest_view, strip_annotations,
};

impl ConfigEngine {
    /// Reads the plain value at `path`, or `default` when it does not exist.
    ///
    /// Isolated paths read `component`'s tree; keybinds paths read the
    /// shared tree and ignore `component`.
    #[must_use]
    pub fn get_value(&self, component: &str, path: &str, default: Value) -> Value {
        let Ok(parsed) = ConfigPath::parse(path) else {
            debug!(path, "malformed path");
            return default;
        };
        self.node_at(component, &parsed)
            .map_or(default, strip_annotations)
    }

    /// Annotated node at `path`, including any metadata.
    #[must_use]
    pub fn node_at(&self, component: &str, path: &ConfigPath) -> Option<&Node> {
        if let Some(key) = path.action_key() {
            let action = self.shared.action(&key)?;
            return path.index().map_or(Some(action), |index| {
                action.as_array().and_then(|items| items.get(index))
            });
        }
        self.isolated
            .get(&path.system())?
            .get(component)?
            .get_path(path.segments())
    }

    /// Writes `value` at `path`.
    ///
    /// Annotated nodes keep their metadata and only their inner value
    /// changes. Isolated writes create missing intermediate objects but
    /// reject values whose type differs from the current one. Keybinds
    /// writes target the action's owner; the value must be a binding (with
    /// an index) or a list of bindings, and no input may end up bound twice.
    /// On success the owner is marked dirty and a setting-changed
    /// notification fires. Returns `false` for any rejected write.
    pub fn set_value(&mut self, component: &str, path: &str, value: Value) -> bool {
        let parsed = match ConfigPath::parse(path) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(path, error = %err, "malformed path");
                return false;
            }
        };
        if let Some(key) = parsed.action_key() {
            return self.set_keybind(&key, parsed.index(), value);
        }
        self.set_isolated(component, &parsed, value)
    }

    fn set_isolated(&mut self, component: &str, path: &ConfigPath, value: Value) -> bool {
        let Some(tree) = self
            .isolated
            .get_mut(&path.system())
            .and_then(|trees| trees.get_mut(component))
        else {
            debug!(component, %path, "no tree for component");
            return false;
        };
        let incoming = Node::from(&value);
        if let Some(current) = tree
            .get_path(path.segments())
            .filter(|current| !current.accepts(&incoming))
        {
            debug!(
                component,
                %path,
                expected = current.type_name(),
                found = incoming.type_name(),
                "rejected write with mismatched type"
            );
            return false;
        }
        if !tree.set_path(path.segments(), incoming) {
            debug!(component, %path, "path blocked by a non-object value");
            return false;
        }
        self.touch(component);
        self.events.setting_changed(&SettingChanged {
            system: path.system(),
            component: component.to_owned(),
            key_path: path.key_path(),
            value,
        });
        true
    }

    fn set_keybind(&mut self, key: &ActionKey, index: Option<usize>, value: Value) -> bool {
        let Some(owner) = self.shared.owner(key).map(str::to_owned) else {
            debug!(action = %key, "action has no owner");
            return false;
        };
        if !self.write_bindings(key, index, &value) {
            return false;
        }
        self.touch(&owner);
        let key_path = index.map_or_else(|| key.to_string(), |slot| format!("{key}[{slot}]"));
        self.events.setting_changed(&SettingChanged {
            system: System::Keybinds,
            component: owner,
            key_path,
            value,
        });
        self.events.keybinds_modified();
        true
    }

    fn write_bindings(&mut self, key: &ActionKey, index: Option<usize>, value: &Value) -> bool {
        if let Some(slot) = index {
            return self.replace_binding_at(key, slot, value);
        }
        self.replace_action(key, value)
    }

    fn replace_binding_at(&mut self, key: &ActionKey, slot: usize, value: &Value) -> bool {
        let Ok(binding) = Binding::parse(value) else {
            debug!(action = %key, "rejected invalid binding");
            return false;
        };
        let input = binding.input_key();
        if let Some((holder, _)) = self.shared.holder_of(&input, Some((key, slot))) {
            debug!(action = %key, %holder, "input already bound");
            return false;
        }
        let Some(target) = self
            .shared
            .bindings_mut(key)
            .and_then(|items| items.get_mut(slot))
        else {
            debug!(action = %key, slot, "no binding at index");
            return false;
        };
        *target = Node::from(value);
        true
    }

    fn replace_action(&mut self, key: &ActionKey, value: &Value) -> bool {
        let Some(items) = value.as_array() else {
            debug!(action = %key, "expected a list of bindings");
            return false;
        };
        let mut inputs = Vec::with_capacity(items.len());
        for item in items {
            let Ok(binding) = Binding::parse(item) else {
                debug!(action = %key, "rejected invalid binding");
                return false;
            };
            let input = binding.input_key();
            let held_elsewhere = self
                .shared
                .holder_of(&input, None)
                .is_some_and(|(holder, _)| holder != *key);
            if held_elsewhere || inputs.contains(&input) {
                debug!(action = %key, %input, "input already bound");
                return false;
            }
            inputs.push(input);
        }
        self.shared
            .tree_mut()
            .set_path(&key.segments(), Node::from(value))
    }

    /// Restores the manifest default at `target`.
    ///
    /// For isolated systems `target` is `<component>.<dot.path>`; for
    /// keybinds it is `<group>.<action>`. Keybind defaults come from the
    /// action owner's manifest when it declares the action, otherwise from
    /// the first declaring manifest with the framework ahead of plugins in
    /// name order. Several declaring manifests are reported as a warning.
    /// Default bindings already held by another action are skipped and
    /// reported. Returns `true` when a value was written.
    pub fn reset_to_default(
        &mut self,
        system: System,
        target: &str,
        report: &mut InitializationReport,
    ) -> bool {
        if system.is_isolated() {
            self.reset_isolated(system, target)
        } else {
            self.reset_action(target, report)
        }
    }

    fn reset_isolated(&mut self, system: System, target: &str) -> bool {
        let Some((component, rest)) = target.split_once('.') else {
            debug!(%system, target, "reset target needs a component and a path");
            return false;
        };
        let segments: Vec<&str> = rest.split('.').collect();
        let Some(default) = self
            .manifests
            .get(component)
            .and_then(|manifest| manifest_view(manifest, system))
            .and_then(|view| view.get_path(&segments).map(strip_annotations))
        else {
            debug!(%system, target, "no manifest default");
            return false;
        };
        self.set_value(component, &format!("{system}.{rest}"), default)
    }

    fn reset_action(&mut self, target: &str, report: &mut InitializationReport) -> bool {
        let Ok(key) = target.parse::<ActionKey>() else {
            debug!(target, "reset target is not `group.action`");
            return false;
        };
        let declarers = self.manifests.declarers(&key);
        let owner = self.shared.owner(&key);
        let Some(source) = owner
            .filter(|name| declarers.contains(name))
            .or_else(|| declarers.first().copied())
            .map(str::to_owned)
        else {
            debug!(action = %key, "no manifest declares the action");
            return false;
        };
        let path = format!("keybinds.{key}");
        if declarers.len() > 1 {
            report.warning_at(
                path.as_str(),
                format!(
                    "declared by {}; resetting from {source}",
                    declarers.join(", ")
                ),
            );
        }
        let defaults = self
            .manifests
            .get(&source)
            .and_then(|manifest| default_bindings(manifest, &key))
            .unwrap_or_default();
        let mut kept = Vec::with_capacity(defaults.len());
        for binding in defaults {
            let input = binding.input_key();
            match self.shared.holder_of(&input, None) {
                Some((holder, _)) if holder != key => report.warning_at(
                    path.as_str(),
                    format!("`{input}` is held by {holder}; not restored"),
                ),
                _ => kept.push(binding.to_value()),
            }
        }
        self.set_value(&source, &path, Value::Array(kept))
    }
}
