//! The configuration engine.
//!
//! [`ConfigEngine`] owns every manifest, every merged tree, the keybinds
//! ownership map and the dirty set. It is a plain value: the host creates one
//! in its composition root and passes it by reference to collaborators. All
//! mutating operations take `&mut self`; hosts that share the engine across
//! threads wrap it in their own mutex.
//!
//! Typical lifecycle:
//!
//! 1. [`ConfigEngine::register_plugin_manifest`] for each component.
//! 2. [`ConfigEngine::finalize`] to aggregate the framework `settings`.
//! 3. [`ConfigEngine::reconcile_plugin_states`] and
//!    [`ConfigEngine::reconcile_hook_states`] once plugins and hooks are known.
//! 4. [`ConfigEngine::process_all_system_configurations`].
//! 5. Accessors and binding edits, then [`ConfigEngine::save_all_dirty`].

mod accessors;
mod aggregate;
mod bindings;
mod reconcile;
mod save;
mod views;

use std::collections::BTreeMap;
use std::sync::Arc;

use camino::Utf8Path;
use tracing::{debug, info};

use crate::manifest::FRAMEWORK;
use crate::{
    ComponentInfo, DirtyTracker, EngineEvents, EngineOptions, InitializationReport, Manifest,
    ManifestStore, Node, SettingChanged, SharedTree, System, UserFileLayout,
};

/// Per-system trees of isolated systems, keyed by component.
type IsolatedTrees = BTreeMap<System, BTreeMap<String, Node>>;

/// Hierarchical multi-source configuration engine.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{ConfigEngine, InitializationReport, Manifest, System, UserFileLayout};
///
/// let dir = tempfile::tempdir()?;
/// let layout = UserFileLayout::new(dir.path().to_str().expect("utf-8 path"));
/// let mut engine = ConfigEngine::with_layout(layout);
/// engine.register_plugin_manifest(
///     "framework",
///     Manifest::framework_default().with_defaults(System::Logging, json!({"level": {"value": "info"}})),
/// );
///
/// let mut report = InitializationReport::default();
/// engine.finalize(&mut report);
/// engine.process_all_system_configurations(&mut report);
///
/// assert_eq!(engine.get_value("framework", "logging.level", json!(null)), json!("info"));
/// assert!(engine.is_dirty("framework"));
/// # Ok::<_, std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ConfigEngine {
    manifests: ManifestStore,
    layout: UserFileLayout,
    isolated: IsolatedTrees,
    shared: SharedTree,
    keybinds_merged: bool,
    component_info: BTreeMap<String, ComponentInfo>,
    tracker: DirtyTracker,
    events: EngineEvents,
    finalized: bool,
}

impl ConfigEngine {
    /// Creates an engine whose user files follow `options`.
    #[must_use]
    pub fn new(options: &EngineOptions) -> Self {
        Self::with_layout(options.layout())
    }

    /// Creates an engine reading and writing user files through `layout`.
    #[must_use]
    pub fn with_layout(layout: UserFileLayout) -> Self {
        Self {
            manifests: ManifestStore::new(),
            layout,
            isolated: IsolatedTrees::new(),
            shared: SharedTree::new(),
            keybinds_merged: false,
            component_info: BTreeMap::new(),
            tracker: DirtyTracker::new(),
            events: EngineEvents::default(),
            finalized: false,
        }
    }

    /// The user file layout in use.
    #[must_use]
    pub const fn layout(&self) -> &UserFileLayout {
        &self.layout
    }

    /// Registered manifests.
    #[must_use]
    pub const fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    /// Registers `manifest` under `name`; a later registration replaces it.
    ///
    /// Merged trees are only recomputed by the next processing call.
    pub fn register_plugin_manifest(&mut self, name: impl Into<String>, manifest: Manifest) {
        let component: String = name.into();
        let previous = self.manifests.register(component.clone(), manifest);
        if previous.is_some() {
            debug!(%component, "manifest replaced");
        } else {
            debug!(%component, "manifest registered");
        }
    }

    /// Drops a plugin manifest and the isolated trees derived from it.
    ///
    /// The shared keybinds tree is rebuilt on the next call to
    /// [`ConfigEngine::merge_priority_system`]. Returns `false` for the
    /// framework and for unknown names.
    pub fn unregister_plugin_manifest(&mut self, name: &str) -> bool {
        if self.manifests.unregister(name).is_none() {
            debug!(component = name, "nothing to unregister");
            return false;
        }
        for trees in self.isolated.values_mut() {
            trees.remove(name);
        }
        self.component_info.remove(name);
        self.tracker.forget(name);
        true
    }

    /// Loads the framework manifest and aggregates `settings`.
    ///
    /// The built-in framework manifest is registered when the host has not
    /// supplied one.
    pub fn finalize(&mut self, report: &mut InitializationReport) {
        if self.manifests.ensure_framework() {
            info!("using built-in framework manifest");
            report.info("framework: no manifest registered; using built-in defaults");
        }
        self.aggregate_isolated_system(System::Settings, report);
        self.component_info.insert(
            FRAMEWORK.to_owned(),
            ComponentInfo::new(FRAMEWORK, self.manifests.get(FRAMEWORK), true),
        );
        self.finalized = true;
    }

    /// `true` once [`ConfigEngine::finalize`] has run.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Recomputes every system from manifests and user files.
    ///
    /// `settings` is aggregated first so the keybinds merge sees the current
    /// plugin states. The framework's reconciled `plugin_states` and
    /// `hook_states` maps carry over; every other unsaved in-memory edit is
    /// replaced by the recomputed trees, so call
    /// [`ConfigEngine::save_all_dirty`] first to keep them. Each corrupt user
    /// file is reported once per call.
    pub fn process_all_system_configurations(&mut self, report: &mut InitializationReport) {
        let state_maps = self.framework_state_maps();
        self.tracker.reset_corrupted();
        self.aggregate_isolated_system(System::Settings, report);
        self.restore_state_maps(state_maps);
        for system in System::ALL {
            match system {
                System::Settings => {}
                System::Keybinds => self.merge_priority_system(system, report),
                _ => self.aggregate_isolated_system(system, report),
            }
        }
    }

    /// `true` when `component`'s user file is stale.
    #[must_use]
    pub fn is_dirty(&self, component: &str) -> bool {
        self.tracker.is_dirty(component)
    }

    /// Stale components in name order.
    pub fn dirty_components(&self) -> impl Iterator<Item = &str> {
        self.tracker.components()
    }

    /// User files that failed to parse at their last load.
    pub fn corrupted_files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.tracker.corrupted()
    }

    /// Forces `component`'s user file to be rewritten at the next save.
    pub fn mark_dirty(&mut self, component: &str) {
        self.tracker.mark(component);
    }

    /// Registers a setting-changed handler.
    pub fn on_setting_changed<F>(&mut self, handler: F)
    where
        F: Fn(&SettingChanged) + Send + Sync + 'static,
    {
        self.events.on_setting_changed(Arc::new(handler));
    }

    /// Registers a keybinds-modified handler.
    pub fn on_keybinds_modified<F>(&mut self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on_keybinds_modified(Arc::new(handler));
    }

    /// `true` when `component` may carry user overrides.
    fn allows_user_config(&self, component: &str) -> bool {
        self.manifests
            .get(component)
            .is_some_and(|manifest| manifest.config.allow_user_config)
    }

    /// Marks `component` dirty when it may carry user overrides.
    fn touch(&mut self, component: &str) {
        if self.allows_user_config(component) {
            self.tracker.mark(component);
        }
    }
}
