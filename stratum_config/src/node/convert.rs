//! Conversions between [`Node`] trees and `serde_json` values.

use serde_json::{Map, Number, Value};

use super::{Annotated, Node, NodeMeta};

const VALUE_KEY: &str = "value";
const META_KEY: &str = "meta";

impl From<&Value> for Node {
    /// Objects shaped `{"value": .., "meta": {..}?}` become annotated nodes;
    /// everything else maps onto the matching plain variant.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(map) => as_wrapper(map).unwrap_or_else(|| {
                Self::Object(
                    map.iter()
                        .map(|(key, child)| (key.clone(), Self::from(child)))
                        .collect(),
                )
            }),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

fn as_wrapper(map: &Map<String, Value>) -> Option<Node> {
    let value = map.get(VALUE_KEY)?;
    if map.keys().any(|key| key != VALUE_KEY && key != META_KEY) {
        return None;
    }
    let meta = match map.get(META_KEY) {
        None | Some(Value::Null) => None,
        Some(raw @ Value::Object(_)) => Some(serde_json::from_value::<NodeMeta>(raw.clone()).ok()?),
        Some(_) => return None,
    };
    Some(Node::annotated(Node::from(value), meta))
}

impl From<&Node> for Value {
    /// Annotated form: wrappers are kept as `{"value", "meta"}` objects.
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Self::Null,
            Node::Bool(b) => Self::Bool(*b),
            Node::Int(i) => Self::Number((*i).into()),
            Node::Float(f) => Number::from_f64(*f).map_or(Self::Null, Self::Number),
            Node::String(s) => Self::String(s.clone()),
            Node::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Node::Object(map) => Self::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), Self::from(child)))
                    .collect(),
            ),
            Node::Annotated(inner) => annotated_to_json(inner),
        }
    }
}

fn annotated_to_json(inner: &Annotated) -> Value {
    let mut map = Map::new();
    map.insert(VALUE_KEY.to_owned(), Value::from(&inner.value));
    if let Some(meta) = inner.meta.as_ref().filter(|meta| !meta.is_empty()) {
        if let Ok(encoded) = serde_json::to_value(meta) {
            map.insert(META_KEY.to_owned(), encoded);
        }
    }
    Value::Object(map)
}

/// Produces the plain JSON form of `node` used in persisted user files.
///
/// Annotation wrappers collapse to their inner value and objects drop a
/// `meta` entry holding presentation metadata (`title`, `description`,
/// `widget`), so no presentation bookkeeping reaches disk. A `meta` key of
/// any other shape is ordinary data and is kept.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stratum_config::{Node, strip_annotations};
///
/// let tree = Node::from(json!({
///     "level": {"value": "info", "meta": {"title": "log.level"}},
///     "toggle": {"bindings": [], "meta": {"title": "toggle"}},
///     "profile": {"meta": "kept"}
/// }));
/// assert_eq!(
///     strip_annotations(&tree),
///     json!({"level": "info", "toggle": {"bindings": []}, "profile": {"meta": "kept"}})
/// );
/// ```
#[must_use]
pub fn strip_annotations(node: &Node) -> Value {
    match node {
        Node::Annotated(inner) => strip_annotations(&inner.value),
        Node::Array(items) => Value::Array(items.iter().map(strip_annotations).collect()),
        Node::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, child)| !is_meta_block(key, child))
                .map(|(key, child)| (key.clone(), strip_annotations(child)))
                .collect(),
        ),
        scalar => Value::from(scalar),
    }
}

fn is_meta_block(key: &str, child: &Node) -> bool {
    key == META_KEY
        && matches!(child, Node::Object(_))
        && serde_json::from_value::<NodeMeta>(Value::from(child)).is_ok()
}
