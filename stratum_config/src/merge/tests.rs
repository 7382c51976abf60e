//! Unit tests for the recursive merge.

use rstest::rstest;
use serde_json::{Value, json};

use super::merge_trees;
use crate::{Node, strip_annotations};

fn merge(defaults: Value, user: Value) -> (Value, Vec<String>) {
    let outcome = merge_trees(&Node::from(defaults), &Node::from(user), "ui");
    let paths = outcome.warnings.into_iter().map(|w| w.path).collect();
    (Value::from(&outcome.tree), paths)
}

#[test]
fn missing_user_keys_keep_defaults() {
    let defaults = json!({"a": {"value": 1, "meta": {"title": "a"}}, "b": "x"});
    let (tree, warnings) = merge(defaults.clone(), json!({}));
    assert_eq!(tree, defaults);
    assert!(warnings.is_empty());
}

#[test]
fn plain_user_value_fills_wrapper() {
    let (tree, warnings) = merge(
        json!({"scale": {"value": 1, "meta": {"title": "ui.scale"}}}),
        json!({"scale": 2.5}),
    );
    assert_eq!(
        tree,
        json!({"scale": {"value": 2.5, "meta": {"title": "ui.scale"}}})
    );
    assert!(warnings.is_empty());
}

#[test]
fn mismatch_keeps_wrapped_default() {
    let defaults = json!({
        "windows": {"main_window": {"is_visible": {"value": true, "meta": {"title": "vis"}}}}
    });
    let (tree, warnings) = merge(
        defaults.clone(),
        json!({"windows": {"main_window": {"is_visible": "yes"}}}),
    );
    assert_eq!(tree, defaults);
    assert_eq!(warnings, ["ui.windows.main_window.is_visible"]);
}

#[rstest]
#[case::bool_for_string(json!({"k": "a"}), json!({"k": false}))]
#[case::object_for_scalar(json!({"k": 3}), json!({"k": {"nested": 1}}))]
#[case::array_for_object(json!({"k": {"x": 1}}), json!({"k": [1]}))]
fn plain_mismatches_warn(#[case] defaults: Value, #[case] user: Value) {
    let (tree, warnings) = merge(defaults.clone(), user);
    assert_eq!(tree, defaults);
    assert_eq!(warnings, ["ui.k"]);
}

#[test]
fn user_only_keys_pass_through() {
    let (tree, _) = merge(
        json!({"known": 1}),
        json!({"vendor": {"anything": [true, null]}}),
    );
    assert_eq!(
        tree,
        json!({"known": 1, "vendor": {"anything": [true, null]}})
    );
}

#[test]
fn arrays_replace_wholesale() {
    let (tree, _) = merge(json!({"list": [1, 2, 3]}), json!({"list": [9]}));
    assert_eq!(tree, json!({"list": [9]}));
}

#[test]
fn nested_wrappers_merge_recursively() {
    let defaults = json!({
        "panel": {"value": {"width": 100, "dock": "left"}, "meta": {"title": "panel"}}
    });
    let (tree, warnings) = merge(
        defaults,
        json!({"panel": {"value": {"width": 240}}}),
    );
    assert_eq!(
        tree,
        json!({"panel": {"value": {"width": 240, "dock": "left"}, "meta": {"title": "panel"}}})
    );
    assert!(warnings.is_empty());
}

#[test]
fn null_default_accepts_anything() {
    let (tree, warnings) = merge(json!({"slot": null}), json!({"slot": {"id": 4}}));
    assert_eq!(tree, json!({"slot": {"id": 4}}));
    assert!(warnings.is_empty());
}

#[test]
fn merge_is_idempotent() {
    let defaults = Node::from(json!({"a": {"value": 1, "meta": {"title": "a"}}, "b": {"c": "x"}}));
    let user = Node::from(json!({"a": 2, "b": {"c": 7}}));
    let first = merge_trees(&defaults, &user, "settings");
    let second = merge_trees(&defaults, &user, "settings");
    assert_eq!(first, second);
}

#[test]
fn stripped_result_round_trips() {
    let defaults = Node::from(json!({
        "level": {"value": "info", "meta": {"title": "log.level"}},
        "sinks": {"file": {"value": true}}
    }));
    let user = Node::from(json!({"level": "debug", "extra": 1}));
    let merged = merge_trees(&defaults, &user, "logging").tree;
    let stripped = strip_annotations(&merged);
    let remerged = merge_trees(&defaults, &Node::from(&stripped), "logging");
    assert!(remerged.is_clean());
    assert_eq!(strip_annotations(&remerged.tree), stripped);
}
