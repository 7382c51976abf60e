//! Outbound notifications to collaborators.
//!
//! Handlers run synchronously on the configuration owner's thread, after the
//! change has been applied to the in-memory trees.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::System;

/// Payload of a setting-changed notification.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingChanged {
    /// System the value lives in.
    pub system: System,
    /// Component whose tree changed; the owner for keybinds.
    pub component: String,
    /// Dot path below the system, including any `[index]` suffix.
    pub key_path: String,
    /// The new value in plain JSON form.
    pub value: Value,
}

/// Handler for [`SettingChanged`] notifications.
pub type SettingChangedHandler = Arc<dyn Fn(&SettingChanged) + Send + Sync>;

/// Handler fired after any binding insert, update or delete.
pub type KeybindsModifiedHandler = Arc<dyn Fn() + Send + Sync>;

/// Registered notification handlers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use stratum_config::EngineEvents;
///
/// let fired = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&fired);
/// let mut events = EngineEvents::default();
/// events.on_keybinds_modified(Arc::new(move || {
///     counter.fetch_add(1, Ordering::Relaxed);
/// }));
/// events.keybinds_modified();
/// assert_eq!(fired.load(Ordering::Relaxed), 1);
/// ```
#[derive(Clone, Default)]
pub struct EngineEvents {
    setting_changed: Vec<SettingChangedHandler>,
    keybinds_modified: Vec<KeybindsModifiedHandler>,
}

impl fmt::Debug for EngineEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEvents")
            .field("setting_changed", &self.setting_changed.len())
            .field("keybinds_modified", &self.keybinds_modified.len())
            .finish()
    }
}

impl EngineEvents {
    /// Adds a setting-changed handler.
    pub fn on_setting_changed(&mut self, handler: SettingChangedHandler) {
        self.setting_changed.push(handler);
    }

    /// Adds a keybinds-modified handler.
    pub fn on_keybinds_modified(&mut self, handler: KeybindsModifiedHandler) {
        self.keybinds_modified.push(handler);
    }

    /// Notifies every setting-changed handler.
    pub fn setting_changed(&self, change: &SettingChanged) {
        for handler in &self.setting_changed {
            handler(change);
        }
    }

    /// Notifies every keybinds-modified handler.
    pub fn keybinds_modified(&self) {
        for handler in &self.keybinds_modified {
            handler();
        }
    }
}
