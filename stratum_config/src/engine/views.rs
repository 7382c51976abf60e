//! Read-only views over the merged state.

use std::collections::BTreeMap;

use super::ConfigEngine;
use crate::{ComponentInfo, Node, OwnershipMap, SharedTree, System};

impl ConfigEngine {
    /// Component info built by the last plugin-state reconciliation.
    #[must_use]
    pub const fn all_component_info(&self) -> &BTreeMap<String, ComponentInfo> {
        &self.component_info
    }

    /// Annotated trees of every system each component exposes to end users.
    ///
    /// Components that disallow user configuration or expose nothing are
    /// omitted. The keybinds entry holds only the actions the component owns.
    #[must_use]
    pub fn aggregated_user_settings(&self) -> BTreeMap<String, BTreeMap<System, Node>> {
        let mut settings = BTreeMap::new();
        for (name, manifest) in self.manifests.iter() {
            let mut exposed = BTreeMap::new();
            for system in System::ALL {
                if !manifest.config.exposes(system) {
                    continue;
                }
                let tree = if system.is_isolated() {
                    self.component_config(name, system).cloned()
                } else if self.keybinds_merged {
                    Some(self.shared.owned_tree(name))
                } else {
                    None
                };
                if let Some(node) = tree {
                    exposed.insert(system, node);
                }
            }
            if !exposed.is_empty() {
                settings.insert(name.to_owned(), exposed);
            }
        }
        settings
    }

    /// The shared tree of a priority-merged system.
    ///
    /// Returns `None` for isolated systems and before the first merge.
    #[must_use]
    pub fn merged_config(&self, system: System) -> Option<&Node> {
        (!system.is_isolated() && self.keybinds_merged).then(|| self.shared.tree())
    }

    /// Every component's tree for an isolated system.
    #[must_use]
    pub fn all_component_settings(&self, system: System) -> Option<&BTreeMap<String, Node>> {
        self.isolated.get(&system)
    }

    /// One component's tree for an isolated system.
    #[must_use]
    pub fn component_config(&self, component: &str, system: System) -> Option<&Node> {
        self.isolated.get(&system)?.get(component)
    }

    /// The shared keybinds tree with its ownership map.
    #[must_use]
    pub const fn shared(&self) -> &SharedTree {
        &self.shared
    }

    /// Owner of every keybind action.
    #[must_use]
    pub const fn ownership(&self) -> &OwnershipMap {
        self.shared.owners()
    }
}
