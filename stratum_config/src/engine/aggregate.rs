//! Isolated aggregation and the keybinds priority merge.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::ConfigEngine;
use crate::manifest::FRAMEWORK;
use crate::{
    DirtyTracker, InitializationReport, Node, PriorityMerge, StratumError, System, UserFile,
    UserFileLayout, manifest_view, merge_trees,
};

impl ConfigEngine {
    /// Recomputes every component's tree for the isolated `system`.
    ///
    /// Components without defaults for `system` get no entry. Missing or
    /// corrupt user files fall back to defaults and mark the component
    /// dirty; rejected user values keep their defaults, are reported and
    /// mark the component dirty.
    pub fn aggregate_isolated_system(&mut self, system: System, report: &mut InitializationReport) {
        if !system.is_isolated() {
            debug!(%system, "not an isolated system");
            return;
        }
        let mut trees = BTreeMap::new();
        for (name, manifest) in self.manifests.iter() {
            let Some(defaults) = manifest_view(manifest, system) else {
                continue;
            };
            if !manifest.config.allow_user_config {
                trees.insert(name.to_owned(), defaults);
                continue;
            }
            let merged = match self.layout.load(name) {
                UserFile::Missing => {
                    self.tracker.mark(name);
                    defaults
                }
                UserFile::Corrupt(err) => {
                    note_corrupt(&mut self.tracker, &self.layout, name, &err, report);
                    defaults
                }
                loaded @ UserFile::Loaded(_) => {
                    let Some(section) = loaded.section(system) else {
                        trees.insert(name.to_owned(), defaults);
                        continue;
                    };
                    let outcome = merge_trees(&defaults, &Node::from(section), system.as_str());
                    if !outcome.is_clean() {
                        self.tracker.mark(name);
                    }
                    for warning in &outcome.warnings {
                        warn!(component = name, path = %warning.path, "{warning}");
                        report.warning_at(warning.path.as_str(), format!("{name}: {warning}"));
                    }
                    outcome.tree
                }
            };
            trees.insert(name.to_owned(), merged);
        }
        self.isolated.insert(system, trees);
    }

    /// Rebuilds the shared tree and ownership map for `keybinds`.
    ///
    /// Sources are processed in six passes: the framework user file, enabled
    /// plugin user files, framework defaults, enabled plugin defaults, then
    /// disabled plugin user files and defaults. Disabled plugins still
    /// reserve their actions and inputs.
    /// Afterwards every component whose on-disk slice differs from the
    /// actions it now owns is marked dirty.
    pub fn merge_priority_system(&mut self, system: System, report: &mut InitializationReport) {
        if system.is_isolated() {
            debug!(%system, "not a priority-merge system");
            return;
        }
        let states = self.plugin_states();
        let (active, disabled): (Vec<&str>, Vec<&str>) = self
            .manifests
            .plugins()
            .map(|(name, _)| name)
            .partition(|name| states.get(*name).copied().unwrap_or(false));

        let mut user_fragments = BTreeMap::new();
        let mut on_disk = BTreeMap::new();
        for (name, manifest) in self.manifests.iter() {
            if !manifest.config.allow_user_config {
                continue;
            }
            match self.layout.load(name) {
                UserFile::Missing => {
                    self.tracker.mark(name);
                }
                UserFile::Corrupt(err) => {
                    note_corrupt(&mut self.tracker, &self.layout, name, &err, report);
                }
                loaded @ UserFile::Loaded(_) => {
                    let section = loaded.section(system).cloned();
                    if let Some(raw) = &section {
                        user_fragments.insert(name, Node::from(raw));
                    }
                    on_disk.insert(name, section.unwrap_or_else(|| Value::Object(Map::new())));
                }
            }
        }
        let defaults: BTreeMap<&str, Node> = self
            .manifests
            .iter()
            .filter_map(|(name, manifest)| manifest_view(manifest, system).map(|view| (name, view)))
            .collect();

        let framework = [FRAMEWORK];
        let passes = [
            (&user_fragments, framework.as_slice()),
            (&user_fragments, active.as_slice()),
            (&defaults, framework.as_slice()),
            (&defaults, active.as_slice()),
            (&user_fragments, disabled.as_slice()),
            (&defaults, disabled.as_slice()),
        ];
        let mut merge = PriorityMerge::new(report);
        for (source, names) in passes {
            for name in names {
                if let Some(fragment) = source.get(name) {
                    merge.process_source(fragment, name);
                }
            }
        }
        let outcome = merge.finish(&self.manifests);

        for name in &outcome.dirty {
            self.tracker.mark(name);
        }
        for (name, disk) in &on_disk {
            if outcome.shared.owned_slice(name) != *disk {
                debug!(component = *name, "keybinds slice differs from disk");
                self.tracker.mark(name);
            }
        }
        self.shared = outcome.shared;
        self.keybinds_merged = true;
    }

    /// Enabled flags from the framework's `settings.plugin_states`.
    pub(super) fn plugin_states(&self) -> BTreeMap<String, bool> {
        self.framework_settings()
            .and_then(|settings| settings.get("plugin_states"))
            .and_then(Node::as_object)
            .map(|states| {
                states
                    .iter()
                    .filter_map(|(name, node)| {
                        node.as_bool().map(|enabled| (name.clone(), enabled))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn framework_settings(&self) -> Option<&Node> {
        self.isolated.get(&System::Settings)?.get(FRAMEWORK)
    }
}

/// Marks `name` stale and its file corrupted. Only the first sighting since
/// the corrupted marks were last reset is reported.
fn note_corrupt(
    tracker: &mut DirtyTracker,
    layout: &UserFileLayout,
    name: &str,
    err: &StratumError,
    report: &mut InitializationReport,
) {
    tracker.mark(name);
    let path = layout.path_for(name);
    if tracker.is_corrupted(&path) {
        return;
    }
    warn!(component = name, %path, error = %err, "unreadable user file");
    report.warning_at(path.as_str(), format!("{name}: {err}; using defaults"));
    tracker.mark_corrupted(&path);
}
