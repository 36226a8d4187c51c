//! Option lists for selection controls.
//!
//! - normalizing configuration nodes into `{id, label}` pairs (`format_items`)
//! - picking nested sub-lists out of the configuration tree (`value_label_list`)
//! - resolving a stored value back to its display label (`label_of`)
//! - the full set of search-form lists built from a `Configuration` (`search`)

use tracing::debug;

use crate::domain::{ConfigNode, NamedOption, ValueLabel};

pub mod search;

pub use search::*;

/// Normalize a list of configuration nodes, one output per input, in order.
///
/// Records take `label || name` as label and `id || iso_code || name || value`
/// as id; empty strings count as missing.
pub fn format_items(items: &[ConfigNode]) -> Vec<ValueLabel> {
    items.iter().map(format_item).collect()
}

fn format_item(item: &ConfigNode) -> ValueLabel {
    match item {
        ConfigNode::Leaf(s) => ValueLabel::new(s.clone(), s.clone()),
        ConfigNode::Record(record) => {
            let label = first_present([&record.label, &record.name]);
            let id = first_present([&record.id, &record.iso_code, &record.name, &record.value]);
            ValueLabel::new(id, label)
        }
    }
}

fn first_present<const N: usize>(candidates: [&Option<String>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}

/// One step down the configuration tree: the node whose name (or label, at
/// the first level) equals `value`, then its list stored under `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub field: String,
    pub value: String,
}

impl Level {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Formatted option list at the depth given by the levels.
///
/// Lookups are first-match. Any miss (no matching node, missing or empty
/// nested field) yields an empty list.
pub fn value_label_list(items: &[ConfigNode], level1: Option<&Level>, level2: Option<&Level>) -> Vec<ValueLabel> {
    let Some(level1) = level1 else {
        return format_items(items);
    };

    let first = find_node(items, &level1.value, true).and_then(|node| nested(node, level1));
    let Some(first) = first else {
        debug!(field = %level1.field, value = %level1.value, "level 1 lookup found no options");
        return Vec::new();
    };

    let Some(level2) = level2 else {
        return format_items(first);
    };

    let second = find_node(first, &level2.value, false).and_then(|node| nested(node, level2));
    match second {
        Some(list) => format_items(list),
        None => {
            debug!(field = %level2.field, value = %level2.value, "level 2 lookup found no options");
            Vec::new()
        }
    }
}

fn find_node<'a>(items: &'a [ConfigNode], value: &str, match_label: bool) -> Option<&'a ConfigNode> {
    items
        .iter()
        .find(|item| item.name() == Some(value) || (match_label && item.label() == Some(value)))
}

fn nested<'a>(node: &'a ConfigNode, level: &Level) -> Option<&'a [ConfigNode]> {
    node.children(&level.field).filter(|list| !list.is_empty())
}

/// Items that can resolve a stored value to a display label.
pub trait AsOption {
    /// The label to show when this item represents `value`.
    fn label_for(&self, value: &str) -> Option<&str>;
}

impl AsOption for NamedOption {
    fn label_for(&self, value: &str) -> Option<&str> {
        match self {
            NamedOption::Plain(s) => s.label_for(value),
            NamedOption::Labeled(vl) => vl.label_for(value),
        }
    }
}

impl AsOption for ValueLabel {
    fn label_for(&self, value: &str) -> Option<&str> {
        (self.id == value).then_some(self.label.as_str())
    }
}

impl AsOption for String {
    fn label_for(&self, value: &str) -> Option<&str> {
        (self == value).then_some(self.as_str())
    }
}

/// Label of `value` in `items`, or `value` itself when nothing matches.
pub fn label_of<T: AsOption>(items: &[T], value: &str) -> String {
    items
        .iter()
        .find_map(|item| item.label_for(value))
        .unwrap_or(value)
        .to_string()
}
