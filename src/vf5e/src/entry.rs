//! Entry trees and text flattening
//!
//! Descriptive text in the corpus is stored as an "entry tree": a list whose
//! elements are strings (with inline `{@tag payload}` markup), objects holding
//! a nested `entries` list, or objects that only carry a `name`.
//!
//! Trees are parsed into [`EntryNode`] once at the boundary, then flattened
//! depth-first into plain-text fragments.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Inline tag: `{@word payload}` -> `payload`
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{@[^} ]+ ([^}]+)\}").expect("tag pattern is valid"));

/// A single node of an entry tree
#[derive(Debug, Clone, PartialEq)]
pub enum EntryNode {
    /// Plain text, possibly containing tag markup
    Text(String),
    /// Object with a nested `entries` list
    Section(Vec<EntryNode>),
    /// Object with a `name` but no nested list
    Named(String),
    /// Anything else; contributes nothing
    Ignored,
}

impl EntryNode {
    /// Parse one node from raw JSON
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => EntryNode::Text(text.clone()),
            Value::Object(map) => match (map.get("entries"), map.get("name")) {
                (Some(Value::Array(children)), _) => EntryNode::Section(parse_tree(children)),
                (_, Some(Value::String(name))) => EntryNode::Named(name.clone()),
                _ => EntryNode::Ignored,
            },
            _ => EntryNode::Ignored,
        }
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            EntryNode::Text(text) | EntryNode::Named(text) => out.push(strip_tags(text)),
            EntryNode::Section(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
            EntryNode::Ignored => {}
        }
    }
}

/// Parse a list of raw nodes
pub fn parse_tree(values: &[Value]) -> Vec<EntryNode> {
    values.iter().map(EntryNode::from_value).collect()
}

/// Parse the tree held by a record field. Missing or non-list fields give an empty tree.
pub fn tree_from_field(value: Option<&Value>) -> Vec<EntryNode> {
    match value {
        Some(Value::Array(values)) => parse_tree(values),
        _ => Vec::new(),
    }
}

/// Replace every `{@tag payload}` with its payload (single level)
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "$1").into_owned()
}

/// Flatten a tree into text fragments, depth-first, left to right
pub fn flatten_entries(tree: &[EntryNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in tree {
        node.flatten_into(&mut out);
    }
    out
}

/// Flatten a tree and join the fragments with single spaces
pub fn describe(tree: &[EntryNode]) -> String {
    flatten_entries(tree).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flatten_json(value: Value) -> Vec<String> {
        flatten_entries(&tree_from_field(Some(&value)))
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("Deals {@dice 2d6} damage"), "Deals 2d6 damage");
        assert_eq!(
            strip_tags("{@spell fireball} and {@condition prone|XPHB}"),
            "fireball and prone|XPHB"
        );
        assert_eq!(strip_tags("no markup"), "no markup");
        // Tags without a payload are left alone
        assert_eq!(strip_tags("{@b}"), "{@b}");
    }

    #[test]
    fn test_nested_tags_strip_one_level() {
        // The outer tag swallows the inner opener; the leftover brace stays
        assert_eq!(strip_tags("{@note see {@item rope}}"), "see {@item rope}");
    }

    #[test]
    fn test_flatten_order_and_markup() {
        let fragments = flatten_json(json!(["Deals {@dice 2d6} damage", {"entries": ["sub"]}]));
        assert_eq!(fragments, vec!["Deals 2d6 damage", "sub"]);
    }

    #[test]
    fn test_flatten_named_and_ignored_nodes() {
        let fragments = flatten_json(json!([
            {"type": "entries", "name": "Heading", "entries": ["body", {"entries": ["deep"]}]},
            {"type": "item", "name": "{@b Bold} Name"},
            {"type": "image"},
            42,
            null,
            "tail"
        ]));
        assert_eq!(fragments, vec!["body", "deep", "Bold Name", "tail"]);
    }

    #[test]
    fn test_non_list_entries_fall_back_to_name() {
        let fragments = flatten_json(json!([{"name": "Fallback", "entries": "not a list"}]));
        assert_eq!(fragments, vec!["Fallback"]);
    }

    #[test]
    fn test_missing_tree_is_empty() {
        assert!(tree_from_field(None).is_empty());
        assert!(tree_from_field(Some(&json!("text"))).is_empty());
        assert_eq!(describe(&[]), "");
    }

    #[test]
    fn test_describe_joins_with_spaces() {
        let tree = tree_from_field(Some(&json!(["a", {"entries": ["b", "c"]}])));
        assert_eq!(describe(&tree), "a b c");
    }
}
