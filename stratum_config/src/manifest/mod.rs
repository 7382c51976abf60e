//! Component manifests: declared defaults, policy and UI metadata.
//!
//! A manifest is pure data. It is registered once per component name and
//! replaced wholesale on re-registration; the engine derives every merged
//! tree from it through [`manifest_view`].

mod store;
mod view;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Binding, StratumResult, StratumResultExt, System, WidgetHint};

pub use store::ManifestStore;
pub(crate) use view::annotate;
pub use view::{default_bindings, manifest_view};

/// Reserved name of the core component.
pub const FRAMEWORK: &str = "framework";

/// Declared keybind defaults: `group → action → bindings`.
pub type KeybindDefaults = BTreeMap<String, BTreeMap<String, Vec<Binding>>>;

/// Display metadata for a component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestInfo {
    /// Localization key or literal display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Component version string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Author or maintainer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Localization key or literal description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contact and social links keyed by kind (`homepage`, `issues`, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

impl ManifestInfo {
    /// `true` when no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.version.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.links.is_empty()
    }

    /// `true` when a non-blank description is declared.
    #[must_use]
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// What end users may configure for a component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPolicy {
    /// Whether user overrides are loaded and persisted at all.
    pub allow_user_config: bool,
    /// Systems exposed to end-user configuration.
    pub user_configurable: Vec<System>,
    /// Capabilities the component needs from the host.
    pub required_capabilities: Vec<String>,
}

impl Default for ConfigPolicy {
    fn default() -> Self {
        Self {
            allow_user_config: true,
            user_configurable: Vec::new(),
            required_capabilities: Vec::new(),
        }
    }
}

impl ConfigPolicy {
    /// `true` when the component allows user configuration and exposes at
    /// least one system to end users.
    #[must_use]
    pub fn has_settings(&self) -> bool {
        self.allow_user_config && !self.user_configurable.is_empty()
    }

    /// `true` when `system` is exposed to end users.
    #[must_use]
    pub fn exposes(&self, system: System) -> bool {
        self.allow_user_config && self.user_configurable.contains(&system)
    }
}

/// Title, description and widget hint for one declared path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Dot path within the system (`group.action` for keybinds).
    pub path: String,
    /// Localization key of the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Localization key of the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Widget hint, used by custom settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetHint>,
}

impl MetadataEntry {
    /// Entry with only a title and description.
    #[must_use]
    pub fn titled(
        path: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: Some(title.into()),
            description: Some(description.into()),
            widget: None,
        }
    }
}

/// Parallel metadata lists, one per system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestMetadata {
    /// Entries for `settings`.
    pub settings: Vec<MetadataEntry>,
    /// Entries for `logging`.
    pub logging: Vec<MetadataEntry>,
    /// Entries for `localization`.
    pub localization: Vec<MetadataEntry>,
    /// Entries for `keybinds`.
    pub keybinds: Vec<MetadataEntry>,
    /// Entries for `ui`.
    pub ui: Vec<MetadataEntry>,
}

impl ManifestMetadata {
    /// Entries declared for `system`.
    #[must_use]
    pub fn for_system(&self, system: System) -> &[MetadataEntry] {
        match system {
            System::Settings => &self.settings,
            System::Logging => &self.logging,
            System::Localization => &self.localization,
            System::Keybinds => &self.keybinds,
            System::Ui => &self.ui,
        }
    }

    fn for_system_mut(&mut self, system: System) -> &mut Vec<MetadataEntry> {
        match system {
            System::Settings => &mut self.settings,
            System::Logging => &mut self.logging,
            System::Localization => &mut self.localization,
            System::Keybinds => &mut self.keybinds,
            System::Ui => &mut self.ui,
        }
    }
}

/// Declarative default configuration for one component.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{Manifest, System};
///
/// let manifest = Manifest::from_json(json!({
///     "info": {"name": "Minimap", "description": "minimap.description"},
///     "config": {"user_configurable": ["ui"]},
///     "ui": {"opacity": {"value": 0.8}}
/// }))?;
/// assert!(manifest.config.exposes(System::Ui));
/// assert!(manifest.declares(System::Ui));
/// assert!(!manifest.declares(System::Keybinds));
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Display metadata.
    pub info: ManifestInfo,
    /// User-configuration policy.
    pub config: ConfigPolicy,
    /// Free-form settings defaults; may contain annotated nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    /// Logging defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Value>,
    /// Localization defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localization: Option<Value>,
    /// Keybind defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keybinds: Option<KeybindDefaults>,
    /// UI defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<Value>,
    /// Title/description/widget metadata keyed by path.
    pub metadata: ManifestMetadata,
}

impl Manifest {
    /// An empty manifest that allows user configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes a manifest from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StratumError::Serialize`] when the value does not
    /// describe a manifest.
    pub fn from_json(value: Value) -> StratumResult<Self> {
        serde_json::from_value(value).into_stratum()
    }

    /// Built-in framework manifest used when the host registers none.
    ///
    /// Declares empty `plugin_states` and `hook_states` settings maps and
    /// exposes `settings` to end users.
    #[must_use]
    pub fn framework_default() -> Self {
        Self {
            info: ManifestInfo {
                name: Some("framework.name".to_owned()),
                description: Some("framework.description".to_owned()),
                ..ManifestInfo::default()
            },
            config: ConfigPolicy {
                allow_user_config: true,
                user_configurable: vec![System::Settings],
                required_capabilities: Vec::new(),
            },
            settings: Some(serde_json::json!({
                "plugin_states": {},
                "hook_states": {}
            })),
            ..Self::default()
        }
    }

    /// Replaces the policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ConfigPolicy) -> Self {
        self.config = policy;
        self
    }

    /// Replaces the info block.
    #[must_use]
    pub fn with_info(mut self, info: ManifestInfo) -> Self {
        self.info = info;
        self
    }

    /// Sets the defaults of an isolated system.
    ///
    /// Keybind defaults are typed; use [`Manifest::with_keybinds`] or
    /// [`Manifest::with_binding`] for them. Passing [`System::Keybinds`]
    /// here leaves the manifest unchanged.
    #[must_use]
    pub fn with_defaults(mut self, system: System, defaults: Value) -> Self {
        match system {
            System::Settings => self.settings = Some(defaults),
            System::Logging => self.logging = Some(defaults),
            System::Localization => self.localization = Some(defaults),
            System::Ui => self.ui = Some(defaults),
            System::Keybinds => {}
        }
        self
    }

    /// Replaces the keybind defaults.
    #[must_use]
    pub fn with_keybinds(mut self, keybinds: KeybindDefaults) -> Self {
        self.keybinds = Some(keybinds);
        self
    }

    /// Appends one default binding to `group.action`.
    #[must_use]
    pub fn with_binding(mut self, group: &str, action: &str, binding: Binding) -> Self {
        self.keybinds
            .get_or_insert_with(BTreeMap::new)
            .entry(group.to_owned())
            .or_default()
            .entry(action.to_owned())
            .or_default()
            .push(binding);
        self
    }

    /// Appends a metadata entry for `system`.
    #[must_use]
    pub fn with_metadata(mut self, system: System, entry: MetadataEntry) -> Self {
        self.metadata.for_system_mut(system).push(entry);
        self
    }

    /// Raw JSON defaults of an isolated system.
    #[must_use]
    pub fn defaults_for(&self, system: System) -> Option<&Value> {
        match system {
            System::Settings => self.settings.as_ref(),
            System::Logging => self.logging.as_ref(),
            System::Localization => self.localization.as_ref(),
            System::Ui => self.ui.as_ref(),
            System::Keybinds => None,
        }
    }

    /// `true` when the manifest has content for `system`.
    #[must_use]
    pub fn declares(&self, system: System) -> bool {
        match system {
            System::Keybinds => self.keybinds.as_ref().is_some_and(|groups| {
                groups.values().any(|actions| !actions.is_empty())
            }),
            _ => self.defaults_for(system).is_some_and(|value| match value {
                Value::Null => false,
                Value::Object(map) => !map.is_empty(),
                _ => true,
            }),
        }
    }
}

#[cfg(test)]
mod tests;
