//! Projection of a manifest onto one system's default tree.

use super::{Manifest, MetadataEntry};
use crate::{ActionKey, Binding, Node, NodeMap, NodeMeta, System};

/// Default tree that `manifest` contributes to `system`.
///
/// Metadata entries are folded in: the node at each entry's path becomes
/// annotated, and existing metadata fields win over the entry's. Keybind
/// defaults become `group → action → [bindings]`, with the action array
/// annotated when metadata is declared for it. Returns `None` when the
/// manifest has no content for `system`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{Manifest, MetadataEntry, System, manifest_view};
///
/// let manifest = Manifest::new()
///     .with_defaults(System::Logging, json!({"level": "info"}))
///     .with_metadata(System::Logging, MetadataEntry::titled("level", "log.level", "log.level.desc"));
/// let view = manifest_view(&manifest, System::Logging).expect("logging defaults");
/// let level = view.get("level").expect("level");
/// assert!(level.is_annotated());
/// assert!(manifest_view(&manifest, System::Ui).is_none());
/// ```
#[must_use]
pub fn manifest_view(manifest: &Manifest, system: System) -> Option<Node> {
    if !manifest.declares(system) {
        return None;
    }
    let mut tree = match system {
        System::Keybinds => keybinds_tree(manifest),
        _ => Node::from(manifest.defaults_for(system)?),
    };
    for entry in manifest.metadata.for_system(system) {
        let segments: Vec<&str> = entry.path.split('.').collect();
        if let Some(node) = tree.get_path_mut(&segments) {
            annotate(node, entry_meta(entry));
        }
    }
    Some(tree)
}

/// Default bindings `manifest` declares for `key`.
#[must_use]
pub fn default_bindings<'a>(manifest: &'a Manifest, key: &ActionKey) -> Option<&'a [Binding]> {
    manifest
        .keybinds
        .as_ref()?
        .get(&key.group)?
        .get(&key.action)
        .map(Vec::as_slice)
}

fn keybinds_tree(manifest: &Manifest) -> Node {
    let groups = manifest.keybinds.iter().flatten().map(|(group, actions)| {
        let entries: NodeMap = actions
            .iter()
            .map(|(action, bindings)| {
                let list = bindings.iter().map(Binding::to_node).collect();
                (action.clone(), Node::Array(list))
            })
            .collect();
        (group.clone(), Node::Object(entries))
    });
    Node::Object(groups.collect())
}

fn entry_meta(entry: &MetadataEntry) -> NodeMeta {
    NodeMeta {
        title: entry.title.clone(),
        description: entry.description.clone(),
        widget: entry.widget.clone(),
    }
}

pub(crate) fn annotate(node: &mut Node, meta: NodeMeta) {
    if meta.is_empty() {
        return;
    }
    match node {
        Node::Annotated(inner) => {
            let existing = inner.meta.get_or_insert_with(NodeMeta::default);
            if existing.title.is_none() {
                existing.title = meta.title;
            }
            if existing.description.is_none() {
                existing.description = meta.description;
            }
            if existing.widget.is_none() {
                existing.widget = meta.widget;
            }
        }
        plain => {
            let value = std::mem::replace(plain, Node::Null);
            *plain = Node::annotated(value, Some(meta));
        }
    }
}
