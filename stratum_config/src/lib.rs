//! Manifest-driven configuration merging for plugin-based applications.
//!
//! Each component (the core `framework` and every plugin) registers a
//! [`Manifest`] with defaults for five systems: `settings`, `logging`,
//! `localization`, `ui` and `keybinds`. [`ConfigEngine`] layers each
//! component's JSON user file over those defaults and keeps the result in
//! memory:
//!
//! - isolated systems get one annotated tree per component, merged
//!   recursively with type checking ([`merge_trees`]);
//! - `keybinds` gets one shared tree built by a first-come priority merge
//!   that never binds the same physical input twice ([`PriorityMerge`]).
//!
//! Edits go through path-addressed accessors, mark the owning component
//! dirty and are written back by [`ConfigEngine::save_all_dirty`].

use std::sync::Arc;

mod engine;
mod error;
mod events;
mod keybinds;
mod manifest;
mod merge;
mod node;
mod path;
mod persistence;
mod reconcile;
mod report;
mod result_ext;
mod system;

pub use engine::ConfigEngine;
pub use error::{AggregatedErrors, StratumError};
pub use events::{EngineEvents, KeybindsModifiedHandler, SettingChanged, SettingChangedHandler};
pub use keybinds::{
    Binding, BindingBehavior, ConsumePolicy, InputKey, InputType, OwnershipMap, PressType,
    PriorityMerge, PriorityOutcome, SharedTree,
};
pub use manifest::{
    ConfigPolicy, FRAMEWORK, KeybindDefaults, Manifest, ManifestInfo, ManifestMetadata,
    ManifestStore, MetadataEntry, default_bindings, manifest_view,
};
pub use merge::{MergeOutcome, MergeWarning, merge_trees};
pub use node::{Annotated, Node, NodeMap, NodeMeta, WidgetHint, strip_annotations};
pub use path::{ActionKey, ConfigPath};
pub use persistence::{
    CONFIG_DIR_ENV, DirtyTracker, EngineOptions, SaveFailure, SaveSummary, UserFile,
    UserFileLayout,
};
pub use reconcile::{ComponentInfo, HookDescriptor, Toggleable};
pub use report::{InitializationReport, Issue, Severity};
pub use result_ext::StratumResultExt;
pub use system::{MergeStrategy, System};

/// Result type used by fallible helpers in this crate.
pub type StratumResult<T> = Result<T, Arc<StratumError>>;
