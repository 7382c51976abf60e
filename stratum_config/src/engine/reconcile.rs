//! Plugin and hook state reconciliation.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use super::ConfigEngine;
use crate::manifest::FRAMEWORK;
use crate::reconcile::reconcile_state_map;
use crate::{ComponentInfo, InitializationReport, Node, NodeMap, SettingChanged, System, Toggleable};

const PLUGIN_STATES: &str = "plugin_states";
const HOOK_STATES: &str = "hook_states";

impl ConfigEngine {
    /// Rebuilds the component-info view for the framework plus every name in
    /// `physical`, and brings `settings.plugin_states` in line with it.
    ///
    /// New plugins start disabled; entries for plugins that are no longer
    /// present are pruned. Either change marks the framework dirty. Must run
    /// after [`ConfigEngine::finalize`]; earlier calls are reported and
    /// ignored.
    pub fn reconcile_plugin_states<S: AsRef<str>>(
        &mut self,
        physical: &[S],
        report: &mut InitializationReport,
    ) {
        if !self.require_finalized("reconcile_plugin_states", report) {
            return;
        }
        let live: BTreeMap<String, bool> = physical
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| *name != FRAMEWORK)
            .map(|name| (name.to_owned(), false))
            .collect();
        let effective = self.reconcile_framework_map(PLUGIN_STATES, &live, report);

        self.component_info.clear();
        self.component_info.insert(
            FRAMEWORK.to_owned(),
            ComponentInfo::new(FRAMEWORK, self.manifests.get(FRAMEWORK), true),
        );
        for (name, enabled) in effective {
            let entry = ComponentInfo::new(&name, self.manifests.get(&name), enabled);
            self.component_info.insert(name, entry);
        }
    }

    /// Brings `settings.hook_states` in line with `hooks` and returns the
    /// effective enabled state of each hook.
    ///
    /// Hooks missing from the map are recorded with their current flag;
    /// persisted flags win for hooks already present. Must run after
    /// [`ConfigEngine::finalize`].
    pub fn reconcile_hook_states<T: Toggleable>(
        &mut self,
        hooks: &[T],
        report: &mut InitializationReport,
    ) -> BTreeMap<String, bool> {
        if !self.require_finalized("reconcile_hook_states", report) {
            return BTreeMap::new();
        }
        let live: BTreeMap<String, bool> = hooks
            .iter()
            .map(|hook| (hook.name().to_owned(), hook.is_enabled()))
            .collect();
        self.reconcile_framework_map(HOOK_STATES, &live, report)
    }

    /// Enables or disables a reconciled plugin and re-runs the keybinds
    /// merge.
    ///
    /// The framework is always enabled and unknown plugins are ignored.
    /// Returns `true` when the state changed.
    pub fn set_component_enabled(
        &mut self,
        name: &str,
        enabled: bool,
        report: &mut InitializationReport,
    ) -> bool {
        if name == FRAMEWORK || !self.component_info.contains_key(name) {
            debug!(component = name, "cannot toggle component");
            return false;
        }
        let Some(states) = self.framework_map(PLUGIN_STATES, report) else {
            return false;
        };
        if states.get(name).and_then(Node::as_bool) == Some(enabled) {
            return false;
        }
        states.insert(name.to_owned(), Node::Bool(enabled));
        self.tracker.mark(FRAMEWORK);
        if let Some(entry) = self.component_info.get_mut(name) {
            entry.enabled = enabled;
        }
        info!(component = name, enabled, "component toggled");
        self.events.setting_changed(&SettingChanged {
            system: System::Settings,
            component: FRAMEWORK.to_owned(),
            key_path: format!("{PLUGIN_STATES}.{name}"),
            value: Value::Bool(enabled),
        });
        self.merge_priority_system(System::Keybinds, report);
        true
    }

    /// Copies of the framework's state maps, for carrying them across a
    /// re-aggregation of `settings`.
    pub(super) fn framework_state_maps(&self) -> Vec<(&'static str, Node)> {
        [PLUGIN_STATES, HOOK_STATES]
            .into_iter()
            .filter_map(|map_name| {
                self.framework_settings()?
                    .get(map_name)
                    .cloned()
                    .map(|node| (map_name, node))
            })
            .collect()
    }

    pub(super) fn restore_state_maps(&mut self, maps: Vec<(&'static str, Node)>) {
        let Some(settings) = self
            .isolated
            .get_mut(&System::Settings)
            .and_then(|trees| trees.get_mut(FRAMEWORK))
            .and_then(Node::as_object_mut)
        else {
            return;
        };
        for (map_name, node) in maps {
            settings.insert(map_name.to_owned(), node);
        }
    }

    fn require_finalized(&self, operation: &str, report: &mut InitializationReport) -> bool {
        if !self.finalized {
            report.error(format!("{operation} called before finalize; ignored"));
        }
        self.finalized
    }

    fn reconcile_framework_map(
        &mut self,
        map_name: &str,
        live: &BTreeMap<String, bool>,
        report: &mut InitializationReport,
    ) -> BTreeMap<String, bool> {
        let Some(states) = self.framework_map(map_name, report) else {
            return live.clone();
        };
        let (effective, changed) = reconcile_state_map(states, live, map_name, report);
        if changed {
            info!(map = map_name, "framework state map reconciled");
            self.tracker.mark(FRAMEWORK);
        }
        effective
    }

    /// The framework's `settings.<map_name>` object, created when absent.
    fn framework_map(
        &mut self,
        map_name: &str,
        report: &mut InitializationReport,
    ) -> Option<&mut NodeMap> {
        let settings = self
            .isolated
            .entry(System::Settings)
            .or_default()
            .entry(FRAMEWORK.to_owned())
            .or_insert_with(Node::empty_object);
        if settings.get(map_name).and_then(Node::as_object).is_none() {
            if settings.get(map_name).is_some() {
                report.warning_at(
                    format!("settings.{map_name}"),
                    format!("framework: `{map_name}` is not an object; resetting it"),
                );
            }
            settings.set_path(&[map_name], Node::empty_object());
            self.tracker.mark(FRAMEWORK);
        }
        settings
            .get_path_mut(&[map_name])
            .and_then(Node::as_object_mut)
    }
}
