//! Binding-level edits on the shared keybinds tree.

use serde_json::{Map, Value};
use tracing::debug;

use super::ConfigEngine;
use crate::{ActionKey, Binding, InputKey, Node, default_bindings};

impl ConfigEngine {
    /// Adds or replaces one binding of `action` (`group.action`).
    ///
    /// `fields` is overlaid onto the owner manifest's first default binding
    /// for the action, so a UI only needs to send what the user changed.
    /// When `previous` is given the binding listening to the same input is
    /// replaced; otherwise a binding already on this action with the new
    /// input is replaced, or the new binding is appended.
    ///
    /// The new input must not be held by another action, except by
    /// `clear_from`: that action loses its binding in the same step and its
    /// owner is marked dirty. Returns `false` and changes nothing when the
    /// edit is rejected.
    pub fn update_binding(
        &mut self,
        action: &str,
        previous: Option<&Value>,
        fields: &Value,
        clear_from: Option<&str>,
    ) -> bool {
        let Some((key, owner)) = self.owned_action(action) else {
            return false;
        };
        let Some(overlay) = fields.as_object() else {
            debug!(%action, "binding fields must be an object");
            return false;
        };
        let mut merged = self
            .manifests
            .get(&owner)
            .and_then(|manifest| default_bindings(manifest, &key))
            .and_then(<[Binding]>::first)
            .and_then(|binding| match binding.to_value() {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();
        merged.extend(overlay.clone());
        let binding = match Binding::parse(&Value::Object(merged)) {
            Ok(binding) => binding,
            Err(err) => {
                debug!(%action, error = %err, "rejected invalid binding");
                return false;
            }
        };

        let previous_slot = match previous.map(Binding::parse) {
            None => None,
            Some(Ok(old)) => {
                let Some(slot) = self.slot_of(&key, &old.input_key()) else {
                    debug!(%action, input = %old.input_key(), "previous binding not found");
                    return false;
                };
                Some(slot)
            }
            Some(Err(err)) => {
                debug!(%action, error = %err, "previous binding is invalid");
                return false;
            }
        };
        let clear_key = match clear_from.map(str::parse::<ActionKey>) {
            None => None,
            Some(Ok(parsed)) => Some(parsed),
            Some(Err(err)) => {
                debug!(%action, error = %err, "invalid action to clear");
                return false;
            }
        };

        let input = binding.input_key();
        let mut target_slot = previous_slot;
        let mut cleared = None;
        match self
            .shared
            .holder_of(&input, previous_slot.map(|slot| (&key, slot)))
        {
            None => {}
            Some((holder, slot)) if holder == key && previous_slot.is_none() => {
                target_slot = Some(slot);
            }
            Some((holder, slot)) if holder != key && clear_key.as_ref() == Some(&holder) => {
                cleared = Some((holder, slot));
            }
            Some((holder, _)) => {
                debug!(%action, %input, %holder, "input already bound");
                return false;
            }
        }

        if let Some((holder, slot)) = cleared {
            if let Some(items) = self
                .shared
                .bindings_mut(&holder)
                .filter(|items| slot < items.len())
            {
                items.remove(slot);
            }
            if let Some(holder_owner) = self.shared.owner(&holder).map(str::to_owned) {
                self.touch(&holder_owner);
            }
            debug!(%input, from = %holder, to = %key, "binding moved");
        }
        let Some(items) = self.shared.bindings_mut(&key) else {
            debug!(%action, "action holds no binding list");
            return false;
        };
        put_binding(items, target_slot, binding.to_node());
        self.touch(&owner);
        self.events.keybinds_modified();
        true
    }

    /// Removes the binding of `action` listening to the same input as
    /// `binding`. Returns `false` when no such binding exists.
    pub fn delete_binding(&mut self, action: &str, binding: &Value) -> bool {
        let Some((key, owner)) = self.owned_action(action) else {
            return false;
        };
        let Ok(target) = Binding::parse(binding) else {
            debug!(%action, "binding to delete is invalid");
            return false;
        };
        let Some(slot) = self.slot_of(&key, &target.input_key()) else {
            debug!(%action, input = %target.input_key(), "binding not found");
            return false;
        };
        let Some(items) = self.shared.bindings_mut(&key) else {
            return false;
        };
        if slot >= items.len() {
            return false;
        }
        items.remove(slot);
        self.touch(&owner);
        self.events.keybinds_modified();
        true
    }

    /// Changes one field of the binding of `action` matching `binding`.
    ///
    /// The edited binding is validated again; changing `type` or `key` to an
    /// input held elsewhere is rejected.
    pub fn update_binding_property(
        &mut self,
        action: &str,
        binding: &Value,
        property: &str,
        value: Value,
    ) -> bool {
        let Some((key, owner)) = self.owned_action(action) else {
            return false;
        };
        let Ok(target) = Binding::parse(binding) else {
            debug!(%action, "binding to edit is invalid");
            return false;
        };
        let Some(slot) = self.slot_of(&key, &target.input_key()) else {
            debug!(%action, input = %target.input_key(), "binding not found");
            return false;
        };
        let mut fields = match target.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        fields.insert(property.to_owned(), value);
        let edited = match Binding::parse(&Value::Object(fields)) {
            Ok(edited) => edited,
            Err(err) => {
                debug!(%action, property, error = %err, "rejected binding edit");
                return false;
            }
        };
        if let Some((holder, _)) = self
            .shared
            .holder_of(&edited.input_key(), Some((&key, slot)))
        {
            debug!(%action, input = %edited.input_key(), %holder, "input already bound");
            return false;
        }
        let Some(existing) = self
            .shared
            .bindings_mut(&key)
            .and_then(|items| items.get_mut(slot))
        else {
            return false;
        };
        *existing = edited.to_node();
        self.touch(&owner);
        self.events.keybinds_modified();
        true
    }

    /// Action currently holding the physical input of `binding`.
    #[must_use]
    pub fn action_for_input(&self, binding: &Value) -> Option<ActionKey> {
        let parsed = Binding::parse(binding).ok()?;
        self.shared.action_for_input(&parsed.input_key())
    }

    /// Parses `action` and resolves its owner.
    fn owned_action(&self, action: &str) -> Option<(ActionKey, String)> {
        let key = match action.parse::<ActionKey>() {
            Ok(key) => key,
            Err(err) => {
                debug!(%action, error = %err, "malformed action");
                return None;
            }
        };
        let Some(owner) = self.shared.owner(&key).map(str::to_owned) else {
            debug!(%action, "action has no owner");
            return None;
        };
        Some((key, owner))
    }

    fn slot_of(&self, key: &ActionKey, input: &InputKey) -> Option<usize> {
        self.shared
            .indexed_inputs(key)
            .into_iter()
            .find(|(_, held)| held == input)
            .map(|(slot, _)| slot)
    }
}

/// Replaces the binding at `slot` or appends when there is none.
fn put_binding(items: &mut Vec<Node>, slot: Option<usize>, node: Node) {
    if let Some(existing) = slot.and_then(|index| items.get_mut(index)) {
        *existing = node;
        return;
    }
    items.push(node);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::{ActionKey, Binding, ConfigEngine, InputType, Manifest, UserFileLayout};

    fn engine_with(actions: &[(&str, &str, &str)]) -> ConfigEngine {
        let mut engine = ConfigEngine::with_layout(UserFileLayout::new("/nonexistent/stratum"));
        let mut manifest = Manifest::framework_default();
        for (group, action, key) in actions {
            let binding = Binding::new(InputType::Keyboard, *key);
            manifest = manifest.with_binding(group, action, binding);
        }
        engine.register_plugin_manifest("framework", manifest);
        let mut report = crate::InitializationReport::new();
        engine.finalize(&mut report);
        engine.process_all_system_configurations(&mut report);
        engine
    }

    #[rstest]
    #[case::appends_new_input(json!({"key": "F5"}), 2)]
    #[case::replaces_same_input(json!({"key": "F1", "behavior": "toggle"}), 1)]
    fn update_binding_without_previous(#[case] fields: serde_json::Value, #[case] expected: usize) {
        let mut engine = engine_with(&[("ui", "toggle", "F1")]);
        assert!(engine.update_binding("ui.toggle", None, &fields, None));
        let key = ActionKey::new("ui", "toggle");
        assert_eq!(engine.shared().bindings(&key).len(), expected);
    }

    #[test]
    fn update_binding_overlays_manifest_defaults() {
        let mut engine = ConfigEngine::with_layout(UserFileLayout::new("/nonexistent/stratum"));
        let mut held = Binding::new(InputType::Mouse, "Button4");
        held.press = crate::PressType::Hold;
        held.press_threshold = Some(0.5);
        engine.register_plugin_manifest(
            "framework",
            Manifest::framework_default().with_binding("ui", "zoom", held),
        );
        let mut report = crate::InitializationReport::new();
        engine.finalize(&mut report);
        engine.process_all_system_configurations(&mut report);

        assert!(engine.update_binding("ui.zoom", None, &json!({"key": "Button5"}), None));
        let bindings = engine.shared().bindings(&ActionKey::new("ui", "zoom"));
        let added = bindings.iter().find(|binding| binding.key == "Button5");
        assert_eq!(
            added.map(|binding| binding.press),
            Some(crate::PressType::Hold)
        );
        assert_eq!(added.and_then(|binding| binding.press_threshold), Some(0.5));
    }

    #[test]
    fn update_binding_rejects_input_held_elsewhere() {
        let mut engine = engine_with(&[("ui", "toggle", "F1"), ("ui", "help", "F2")]);
        assert!(!engine.update_binding("ui.help", None, &json!({"key": "F1"}), None));
        let help = ActionKey::new("ui", "help");
        assert_eq!(engine.shared().bindings(&help).len(), 1);
    }

    #[test]
    fn update_binding_moves_input_from_cleared_action() {
        let mut engine = engine_with(&[("ui", "toggle", "F1"), ("ui", "help", "F2")]);
        let previous = json!({"type": "keyboard", "key": "F2"});
        assert!(engine.update_binding(
            "ui.help",
            Some(&previous),
            &json!({"key": "f1"}),
            Some("ui.toggle"),
        ));
        let toggle = ActionKey::new("ui", "toggle");
        assert!(engine.shared().bindings(&toggle).is_empty());
        let help = engine.shared().bindings(&ActionKey::new("ui", "help"));
        assert_eq!(help.len(), 1);
        assert_eq!(
            engine.action_for_input(&json!({"type": "keyboard", "key": "F1"})),
            Some(ActionKey::new("ui", "help"))
        );
    }

    #[test]
    fn update_binding_property_rejects_conflicting_key() {
        let mut engine = engine_with(&[("ui", "toggle", "F1"), ("ui", "help", "F2")]);
        let binding = json!({"type": "keyboard", "key": "F2"});
        assert!(!engine.update_binding_property("ui.help", &binding, "key", json!("F1")));
        assert!(engine.update_binding_property("ui.help", &binding, "behavior", json!("toggle")));
        let help = engine.shared().bindings(&ActionKey::new("ui", "help"));
        assert_eq!(
            help.first().map(|edited| edited.behavior),
            Some(crate::BindingBehavior::Toggle)
        );
    }

    #[rstest]
    #[case::unknown_action("ui.missing")]
    #[case::malformed_action("toggle")]
    fn edits_on_unowned_actions_are_noops(#[case] action: &str) {
        let mut engine = engine_with(&[("ui", "toggle", "F1")]);
        let binding = json!({"type": "keyboard", "key": "F1"});
        assert!(!engine.delete_binding(action, &binding));
        assert!(!engine.update_binding(action, None, &json!({"key": "F9"}), None));
    }
}
