//! The merged keybinds tree and its ownership map.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{Binding, InputKey};
use crate::{ActionKey, Node, strip_annotations};

/// Fully qualified action → component that first declared it.
pub type OwnershipMap = BTreeMap<ActionKey, String>;

/// Result of a priority merge: one tree for every component plus ownership.
///
/// The tree is shaped `group → action → [bindings]`; an action may be an
/// annotated array when metadata is known for it.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedTree {
    tree: Node,
    owners: OwnershipMap,
}

impl Default for SharedTree {
    fn default() -> Self {
        Self {
            tree: Node::empty_object(),
            owners: OwnershipMap::new(),
        }
    }
}

impl SharedTree {
    /// An empty tree with no owners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn from_parts(tree: Node, owners: OwnershipMap) -> Self {
        Self { tree, owners }
    }

    /// The merged tree.
    #[must_use]
    pub const fn tree(&self) -> &Node {
        &self.tree
    }

    pub(crate) const fn tree_mut(&mut self) -> &mut Node {
        &mut self.tree
    }

    /// The ownership map.
    #[must_use]
    pub const fn owners(&self) -> &OwnershipMap {
        &self.owners
    }

    /// Component owning `key`.
    #[must_use]
    pub fn owner(&self, key: &ActionKey) -> Option<&str> {
        self.owners.get(key).map(String::as_str)
    }

    /// Action node for `key`.
    #[must_use]
    pub fn action(&self, key: &ActionKey) -> Option<&Node> {
        self.tree.get_path(&key.segments())
    }

    /// Mutable binding list of `key`.
    pub(crate) fn bindings_mut(&mut self, key: &ActionKey) -> Option<&mut Vec<Node>> {
        self.tree
            .get_path_mut(&key.segments())
            .and_then(Node::as_array_mut)
    }

    /// Valid bindings currently attached to `key`.
    #[must_use]
    pub fn bindings(&self, key: &ActionKey) -> Vec<Binding> {
        self.action(key)
            .and_then(Node::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|node| Binding::from_node(node).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every action in the tree, in group then action order.
    #[must_use]
    pub fn actions(&self) -> Vec<ActionKey> {
        let Some(groups) = self.tree.as_object() else {
            return Vec::new();
        };
        groups
            .iter()
            .flat_map(|(group, actions)| {
                actions
                    .as_object()
                    .into_iter()
                    .flat_map(|map| map.keys())
                    .map(move |action| ActionKey::new(group, action))
            })
            .collect()
    }

    /// Action currently holding the physical input `input`.
    #[must_use]
    pub fn action_for_input(&self, input: &InputKey) -> Option<ActionKey> {
        self.holder_of(input, None).map(|(key, _)| key)
    }

    /// Index and input of every valid binding attached to `key`.
    pub(crate) fn indexed_inputs(&self, key: &ActionKey) -> Vec<(usize, InputKey)> {
        self.action(key)
            .and_then(Node::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, node)| {
                        Binding::from_node(node)
                            .ok()
                            .map(|binding| (index, binding.input_key()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Action and index holding `input`, ignoring the slot `skip`.
    pub(crate) fn holder_of(
        &self,
        input: &InputKey,
        skip: Option<(&ActionKey, usize)>,
    ) -> Option<(ActionKey, usize)> {
        self.actions().into_iter().find_map(|key| {
            self.indexed_inputs(&key)
                .into_iter()
                .find(|(index, held)| {
                    held == input && skip.is_none_or(|(k, i)| *k != key || i != *index)
                })
                .map(|(index, _)| (key.clone(), index))
        })
    }

    /// Annotated subtree of the actions `component` owns.
    #[must_use]
    pub fn owned_tree(&self, component: &str) -> Node {
        let mut tree = Node::empty_object();
        for (key, owner) in &self.owners {
            if owner != component {
                continue;
            }
            if let Some(node) = self.action(key) {
                tree.set_path(&key.segments(), node.clone());
            }
        }
        tree
    }

    /// Plain JSON slice of the actions `component` owns, as persisted in
    /// its user file.
    #[must_use]
    pub fn owned_slice(&self, component: &str) -> Value {
        strip_annotations(&self.owned_tree(component))
    }
}
