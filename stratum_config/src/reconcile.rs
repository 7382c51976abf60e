//! Component-info view and the plugin/hook state maps.
//!
//! The framework's `settings.plugin_states` and `settings.hook_states` maps
//! hold one boolean per plugin or hook. Reconciliation inserts missing names,
//! prunes orphans and repairs non-boolean entries; the engine marks the
//! framework dirty whenever a map changes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ConfigPolicy, InitializationReport, Manifest, ManifestInfo, Node, NodeMap};

/// Derived view of one component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    /// Component name.
    pub name: String,
    /// Info block from the manifest, empty when none was registered.
    pub info: ManifestInfo,
    /// Policy from the manifest, the default when none was registered.
    pub policy: ConfigPolicy,
    /// `true` when a manifest with a non-empty info block is registered.
    pub has_info: bool,
    /// `true` when the manifest declares a description.
    pub has_description: bool,
    /// `true` when the component exposes at least one system to end users.
    pub has_settings: bool,
    /// Current enabled state; always `true` for the framework.
    pub enabled: bool,
}

impl ComponentInfo {
    /// Builds the view of `name` from its manifest, if any.
    #[must_use]
    pub fn new(name: &str, manifest: Option<&Manifest>, enabled: bool) -> Self {
        let info = manifest.map(|m| m.info.clone()).unwrap_or_default();
        let policy = manifest.map(|m| m.config.clone()).unwrap_or_default();
        Self {
            name: name.to_owned(),
            has_info: manifest.is_some() && !info.is_empty(),
            has_description: info.has_description(),
            has_settings: manifest.is_some() && policy.has_settings(),
            info,
            policy,
            enabled,
        }
    }
}

/// A runtime capability that can be switched on and off.
pub trait Toggleable {
    /// Stable name used as the `hook_states` key.
    fn name(&self) -> &str;

    /// Current enabled flag.
    fn is_enabled(&self) -> bool;
}

/// Plain [`Toggleable`] implementation for hosts that track hooks by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookDescriptor {
    /// Hook name.
    pub name: String,
    /// Current enabled flag.
    pub enabled: bool,
}

impl HookDescriptor {
    /// Describes hook `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

impl Toggleable for HookDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Brings the boolean map `states` in line with `live`.
///
/// `live` pairs each present name with the state to insert when it is
/// missing. Returns the effective state of every live name and whether the
/// map changed.
pub(crate) fn reconcile_state_map(
    states: &mut NodeMap,
    live: &BTreeMap<String, bool>,
    map_name: &str,
    report: &mut InitializationReport,
) -> (BTreeMap<String, bool>, bool) {
    let mut changed = false;
    let orphans: Vec<String> = states
        .keys()
        .filter(|name| !live.contains_key(*name))
        .cloned()
        .collect();
    for orphan in orphans {
        states.remove(&orphan);
        changed = true;
        report.info(format!("{map_name}: removed entry for missing `{orphan}`"));
    }
    let mut effective = BTreeMap::new();
    for (name, initial) in live {
        let state = match states.get(name).map(Node::as_bool) {
            Some(Some(enabled)) => enabled,
            Some(None) => {
                report.warning_at(
                    format!("settings.{map_name}.{name}"),
                    format!("{map_name}: `{name}` is not a boolean; resetting to {initial}"),
                );
                states.insert(name.clone(), Node::Bool(*initial));
                changed = true;
                *initial
            }
            None => {
                report.info(format!("{map_name}: added `{name}` as {initial}"));
                states.insert(name.clone(), Node::Bool(*initial));
                changed = true;
                *initial
            }
        };
        effective.insert(name.clone(), state);
    }
    (effective, changed)
}
