//! Recursive merge of user overrides onto annotated default trees.
//!
//! Behaviour:
//! - Keys missing from the user tree keep their default verbatim.
//! - Plain objects, and pairs of annotated nodes, merge recursively.
//! - An annotated default keeps its wrapper and metadata; a compatible user
//!   value replaces only the wrapped value.
//! - Arrays and scalars replace the default wholesale.
//! - Incompatible types keep the default and record a [`MergeWarning`].
//! - Keys present only in the user tree are copied through unchanged.

use std::fmt;

use crate::{Node, NodeMap};

/// A user value rejected because its type does not match the default.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MergeWarning {
    /// Dot path of the rejected value, prefixed with the root passed to
    /// [`merge_trees`].
    pub path: String,
    /// Type of the default that was kept.
    pub expected: &'static str,
    /// Type of the rejected user value.
    pub found: &'static str,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type mismatch at `{}`: expected {}, found {}; keeping default",
            self.path, self.expected, self.found
        )
    }
}

/// Result of [`merge_trees`].
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    /// The merged tree.
    pub tree: Node,
    /// Every rejected user value.
    pub warnings: Vec<MergeWarning>,
}

impl MergeOutcome {
    /// `true` when every user value was accepted.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Merges `user` onto `defaults`.
///
/// `root` prefixes every warning path, typically the system name.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{Node, merge_trees};
///
/// let defaults = Node::from(json!({"visible": {"value": true, "meta": {"title": "t"}}, "scale": 1}));
/// let user = Node::from(json!({"visible": "yes", "scale": 1.5, "custom": [1]}));
/// let outcome = merge_trees(&defaults, &user, "ui");
///
/// let paths: Vec<&str> = outcome.warnings.iter().map(|w| w.path.as_str()).collect();
/// assert_eq!(paths, ["ui.visible"]);
/// assert_eq!(outcome.tree.get("visible").and_then(Node::as_bool), Some(true));
/// assert_eq!(outcome.tree.get("scale"), Some(&Node::Float(1.5)));
/// assert!(outcome.tree.get("custom").is_some());
/// ```
#[must_use]
pub fn merge_trees(defaults: &Node, user: &Node, root: &str) -> MergeOutcome {
    let mut warnings = Vec::new();
    let tree = merge_node(defaults, user, root, &mut warnings);
    MergeOutcome { tree, warnings }
}

fn merge_node(default: &Node, user: &Node, path: &str, warnings: &mut Vec<MergeWarning>) -> Node {
    match (default, user) {
        (Node::Annotated(wrapped), Node::Annotated(incoming)) => Node::annotated(
            merge_node(&wrapped.value, &incoming.value, path, warnings),
            wrapped.meta.clone(),
        ),
        (Node::Annotated(wrapped), plain) => {
            if wrapped.value.accepts(plain) {
                Node::annotated(
                    merge_node(&wrapped.value, plain, path, warnings),
                    wrapped.meta.clone(),
                )
            } else {
                reject(default, user, path, warnings)
            }
        }
        (plain, Node::Annotated(incoming)) => merge_node(plain, &incoming.value, path, warnings),
        (Node::Object(base), Node::Object(overlay)) => {
            Node::Object(merge_maps(base, overlay, path, warnings))
        }
        (base, overlay) if base.accepts(overlay) => overlay.clone(),
        _ => reject(default, user, path, warnings),
    }
}

fn merge_maps(
    base: &NodeMap,
    overlay: &NodeMap,
    path: &str,
    warnings: &mut Vec<MergeWarning>,
) -> NodeMap {
    let mut merged = NodeMap::new();
    for (key, default_child) in base {
        let child_path = format!("{path}.{key}");
        let child = overlay.get(key).map_or_else(
            || default_child.clone(),
            |user_child| merge_node(default_child, user_child, &child_path, warnings),
        );
        merged.insert(key.clone(), child);
    }
    for (key, user_child) in overlay {
        if !base.contains_key(key) {
            merged.insert(key.clone(), user_child.clone());
        }
    }
    merged
}

fn reject(default: &Node, user: &Node, path: &str, warnings: &mut Vec<MergeWarning>) -> Node {
    warnings.push(MergeWarning {
        path: path.to_owned(),
        expected: default.type_name(),
        found: user.type_name(),
    });
    default.clone()
}

#[cfg(test)]
mod tests;
