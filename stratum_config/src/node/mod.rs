//! Annotated configuration trees.
//!
//! Merged configuration is held as a [`Node`] tree: a tagged union over the
//! JSON value kinds plus a distinguished [`Node::Annotated`] wrapper that
//! carries UI metadata next to the raw value. The wire form of a wrapper is
//! `{"value": .., "meta": {..}}`; persisted user files never contain it.

mod convert;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use convert::strip_annotations;

/// Object map used throughout merged trees; sorted for deterministic output.
pub type NodeMap = BTreeMap<String, Node>;

/// A configuration value.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer that fits in `i64`.
    Int(i64),
    /// Any other number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list.
    Array(Vec<Node>),
    /// A plain object.
    Object(NodeMap),
    /// A value wrapped with UI metadata.
    Annotated(Box<Annotated>),
}

/// The payload of [`Node::Annotated`].
#[derive(Clone, Debug, PartialEq)]
pub struct Annotated {
    /// The wrapped value.
    pub value: Node,
    /// Optional presentation metadata.
    pub meta: Option<NodeMeta>,
}

/// Presentation metadata attached to a configuration value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeMeta {
    /// Localization key of the display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Localization key of the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Widget hint for rendering custom settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetHint>,
}

/// Widget type and free-form rendering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetHint {
    /// Widget kind, e.g. `slider` or `combo`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Widget parameters such as ranges or option lists.
    #[serde(default, flatten)]
    pub params: Map<String, Value>,
}

impl NodeMeta {
    /// `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.widget.is_none()
    }
}

impl Node {
    /// Wraps `value` with `meta`.
    #[must_use]
    pub fn annotated(value: Self, meta: Option<NodeMeta>) -> Self {
        Self::Annotated(Box::new(Annotated { value, meta }))
    }

    /// An empty plain object.
    #[must_use]
    pub const fn empty_object() -> Self {
        Self::Object(BTreeMap::new())
    }

    /// Name of the runtime type, looking through annotation wrappers.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.unwrapped() {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Annotated(_) => "annotated",
        }
    }

    /// `true` when `other` may replace `self` during a merge.
    ///
    /// Types must match, except that integers and floats are mutually
    /// compatible and a `null` default accepts any value.
    #[must_use]
    pub fn accepts(&self, other: &Self) -> bool {
        match (self.unwrapped(), other.unwrapped()) {
            (Self::Null, _)
            | (Self::Bool(_), Self::Bool(_))
            | (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_))
            | (Self::String(_), Self::String(_))
            | (Self::Array(_), Self::Array(_))
            | (Self::Object(_), Self::Object(_)) => true,
            _ => false,
        }
    }

    /// The value beneath any annotation wrappers.
    #[must_use]
    pub fn unwrapped(&self) -> &Self {
        let mut node = self;
        while let Self::Annotated(inner) = node {
            node = &inner.value;
        }
        node
    }

    /// Mutable access to the value beneath any annotation wrappers.
    pub fn unwrapped_mut(&mut self) -> &mut Self {
        match self {
            Self::Annotated(inner) => inner.value.unwrapped_mut(),
            other => other,
        }
    }

    /// Metadata of an annotated node.
    #[must_use]
    pub fn meta(&self) -> Option<&NodeMeta> {
        match self {
            Self::Annotated(inner) => inner.meta.as_ref(),
            _ => None,
        }
    }

    /// `true` for [`Node::Annotated`].
    #[must_use]
    pub const fn is_annotated(&self) -> bool {
        matches!(self, Self::Annotated(_))
    }

    /// Boolean payload, looking through wrappers.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrapped() {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Object payload, looking through wrappers.
    #[must_use]
    pub fn as_object(&self) -> Option<&NodeMap> {
        match self.unwrapped() {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable object payload, looking through wrappers.
    pub fn as_object_mut(&mut self) -> Option<&mut NodeMap> {
        match self.unwrapped_mut() {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Array payload, looking through wrappers.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self.unwrapped() {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable array payload, looking through wrappers.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self.unwrapped_mut() {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Child `key` of an object node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Descends through `segments`, looking through wrappers at each step.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Self> {
        segments
            .iter()
            .try_fold(self, |node, segment| node.get(segment.as_ref()))
    }

    /// Mutable descent through `segments`.
    pub fn get_path_mut<S: AsRef<str>>(&mut self, segments: &[S]) -> Option<&mut Self> {
        let mut node = self;
        for segment in segments {
            node = node.as_object_mut()?.get_mut(segment.as_ref())?;
        }
        Some(node)
    }

    /// Writes `value` at `segments`, creating plain objects along the way.
    ///
    /// When the node already at that path is annotated only its inner value
    /// is replaced, so metadata survives. Returns `false` when an existing
    /// non-object node blocks the path or `segments` is empty.
    pub fn set_path<S: AsRef<str>>(&mut self, segments: &[S], value: Self) -> bool {
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut node = self;
        for segment in parents {
            let Some(map) = node.as_object_mut() else {
                return false;
            };
            node = map
                .entry(segment.as_ref().to_owned())
                .or_insert_with(Self::empty_object);
        }
        let Some(map) = node.as_object_mut() else {
            return false;
        };
        match map.get_mut(last.as_ref()) {
            Some(Self::Annotated(existing)) => existing.value = value,
            Some(existing) => *existing = value,
            None => {
                map.insert(last.as_ref().to_owned(), value);
            }
        }
        true
    }

    /// Removes `key` from an object node, returning the old value.
    pub fn remove(&mut self, key: &str) -> Option<Self> {
        self.as_object_mut().and_then(|map| map.remove(key))
    }
}
