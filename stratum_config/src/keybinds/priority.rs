//! Multi-pass, first-come priority merge.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use super::{Binding, InputKey, OwnershipMap, SharedTree};
use crate::manifest::annotate;
use crate::{ActionKey, InitializationReport, ManifestStore, Node, NodeMeta, System};

/// Accumulates contributions to the shared keybinds tree.
///
/// Sources must be fed in precedence order: framework user file, active
/// plugin user files, framework defaults, active plugin defaults, disabled
/// plugin user files, then disabled plugin defaults. The first source to
/// mention an action owns it; the first source to supply a surviving binding
/// for it decides its content. A physical input is accepted at most once
/// across the whole tree.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{ActionKey, InitializationReport, ManifestStore, Node, PriorityMerge};
///
/// let mut report = InitializationReport::default();
/// let mut merge = PriorityMerge::new(&mut report);
/// merge.process_source(&Node::from(json!({"A": {"toggle": [{"type": "keyboard", "key": "F1"}]}})), "A");
/// merge.process_source(&Node::from(json!({"B": {"toggle": [{"type": "keyboard", "key": "F1"}]}})), "B");
/// let outcome = merge.finish(&ManifestStore::new());
///
/// let b_toggle = ActionKey::new("B", "toggle");
/// assert_eq!(outcome.shared.owner(&b_toggle), Some("B"));
/// assert!(outcome.shared.bindings(&b_toggle).is_empty());
/// assert!(outcome.dirty.contains("B"));
/// assert_eq!(report.warnings().count(), 1);
/// ```
#[derive(Debug)]
pub struct PriorityMerge<'r> {
    tree: Node,
    owners: OwnershipMap,
    accepted: HashSet<InputKey>,
    dirty: BTreeSet<String>,
    report: &'r mut InitializationReport,
}

/// The finished shared tree and the components whose files went stale.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityOutcome {
    /// Merged tree and ownership map.
    pub shared: SharedTree,
    /// Components that lost a binding to an earlier source.
    pub dirty: BTreeSet<String>,
}

impl<'r> PriorityMerge<'r> {
    /// Starts an empty merge that records issues in `report`.
    pub fn new(report: &'r mut InitializationReport) -> Self {
        Self {
            tree: Node::empty_object(),
            owners: OwnershipMap::new(),
            accepted: HashSet::new(),
            dirty: BTreeSet::new(),
            report,
        }
    }

    /// Feeds one component's `group → action → bindings` fragment.
    pub fn process_source(&mut self, fragment: &Node, component: &str) {
        let Some(groups) = fragment.as_object() else {
            self.report.warning_at(
                System::Keybinds.as_str(),
                format!("{component}: keybinds must be an object of groups"),
            );
            return;
        };
        for (group, entry) in groups {
            let Some(actions) = entry.as_object() else {
                self.report.warning_at(
                    format!("keybinds.{group}"),
                    format!("{component}: keybind group must be an object of actions"),
                );
                continue;
            };
            for (action, source) in actions {
                self.process_action(ActionKey::new(group, action), source, component);
            }
        }
    }

    fn process_action(&mut self, key: ActionKey, source: &Node, component: &str) {
        self.owners
            .entry(key.clone())
            .or_insert_with(|| component.to_owned());
        if self.tree.get_path(&key.segments()).is_some() {
            return;
        }
        let path = format!("keybinds.{key}");
        let Some(candidates) = source.as_array() else {
            self.report
                .warning_at(path, format!("{component}: bindings must be an array"));
            return;
        };
        let mut surviving = Vec::new();
        for candidate in candidates {
            let binding = match Binding::from_node(candidate) {
                Ok(binding) => binding,
                Err(err) => {
                    self.report.warning_at(
                        path.as_str(),
                        format!("{component}: skipping binding: {err}"),
                    );
                    continue;
                }
            };
            let input = binding.input_key();
            if self.accepted.insert(input.clone()) {
                surviving.push(candidate.unwrapped().clone());
            } else {
                warn!(component, action = %key, input = %input, "binding conflict");
                self.dirty.insert(component.to_owned());
                self.report.warning_at(
                    path.as_str(),
                    format!("{component}: `{input}` is already bound; dropping it from {key}"),
                );
            }
        }
        if surviving.is_empty() {
            return;
        }
        let list = Node::Array(surviving);
        let node = match source {
            Node::Annotated(inner) => Node::annotated(list, inner.meta.clone()),
            _ => list,
        };
        self.tree.set_path(&key.segments(), node);
    }

    /// Completes the merge.
    ///
    /// Every owned action missing from the tree is inserted with no
    /// bindings, then manifest title and description metadata is attached
    /// to actions that carry none.
    #[must_use]
    pub fn finish(mut self, manifests: &ManifestStore) -> PriorityOutcome {
        for key in self.owners.keys() {
            if self.tree.get_path(&key.segments()).is_none() {
                debug!(action = %key, "owned action has no surviving bindings");
                self.tree.set_path(&key.segments(), Node::Array(Vec::new()));
            }
        }
        for (_, manifest) in manifests.iter() {
            for entry in manifest.metadata.for_system(System::Keybinds) {
                let Ok(key) = entry.path.parse::<ActionKey>() else {
                    continue;
                };
                let Some(node) = self.tree.get_path_mut(&key.segments()) else {
                    continue;
                };
                if node.meta().is_some_and(|meta| !meta.is_empty()) {
                    continue;
                }
                annotate(
                    node,
                    NodeMeta {
                        title: entry.title.clone(),
                        description: entry.description.clone(),
                        widget: None,
                    },
                );
            }
        }
        PriorityOutcome {
            shared: SharedTree::from_parts(self.tree, self.owners),
            dirty: self.dirty,
        }
    }
}
