//! Registry of component manifests.

use std::collections::BTreeMap;

use super::{FRAMEWORK, Manifest};
use crate::ActionKey;

/// One manifest per registered component name.
///
/// Plugins iterate in name order, which is the precedence order used by the
/// priority merge and by reset routing. The framework entry is reserved and
/// cannot be unregistered.
#[derive(Clone, Debug, Default)]
pub struct ManifestStore {
    manifests: BTreeMap<String, Manifest>,
}

impl ManifestStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `manifest` under `name`, returning the replaced manifest.
    pub fn register(&mut self, name: impl Into<String>, manifest: Manifest) -> Option<Manifest> {
        self.manifests.insert(name.into(), manifest)
    }

    /// Registers the built-in framework manifest unless one is present.
    ///
    /// Returns `true` when the built-in manifest was inserted.
    pub fn ensure_framework(&mut self) -> bool {
        if self.manifests.contains_key(FRAMEWORK) {
            return false;
        }
        self.manifests
            .insert(FRAMEWORK.to_owned(), Manifest::framework_default());
        true
    }

    /// Removes a plugin manifest. The framework manifest is never removed.
    pub fn unregister(&mut self, name: &str) -> Option<Manifest> {
        if name == FRAMEWORK {
            return None;
        }
        self.manifests.remove(name)
    }

    /// Manifest registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Manifest> {
        self.manifests.get(name)
    }

    /// `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.manifests.contains_key(name)
    }

    /// Registered names in precedence order: framework first, then plugins.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    /// Manifests in precedence order: framework first, then plugins.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Manifest)> {
        let framework = self
            .manifests
            .get_key_value(FRAMEWORK)
            .map(|(name, manifest)| (name.as_str(), manifest));
        framework.into_iter().chain(self.plugins())
    }

    /// Plugin manifests in name order.
    pub fn plugins(&self) -> impl Iterator<Item = (&str, &Manifest)> {
        self.manifests
            .iter()
            .filter(|(name, _)| name.as_str() != FRAMEWORK)
            .map(|(name, manifest)| (name.as_str(), manifest))
    }

    /// Components whose manifest declares default bindings for `key`, in
    /// precedence order.
    #[must_use]
    pub fn declarers(&self, key: &ActionKey) -> Vec<&str> {
        self.iter()
            .filter(|(_, manifest)| super::default_bindings(manifest, key).is_some())
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of registered manifests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    /// `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}
