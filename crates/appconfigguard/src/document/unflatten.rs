//! Flat map → tree transform.
//!
//! Values stay strings. Only values shaped like a JSON object or array are
//! parsed back into structure; booleans and numbers are not recovered.

use super::error::{DocumentError, Result};
use super::flatten::{FlatConfig, PATH_SEPARATOR};
use super::tree::ConfigTree;

/// Highest list index accepted while rebuilding lists.
///
/// A numeric key segment such as `build.20240101` would otherwise allocate a
/// list with twenty million holes.
pub const MAX_LIST_INDEX: usize = 10_000;

/// Rebuilds a tree from dotted paths.
///
/// A canonical decimal segment (`0`, `1`, `12`, no leading zero) is a list
/// index unless the position already holds an object; anything else is an
/// object key. Lists grow with `Null` holes when a higher index arrives first.
/// Entries are applied in path order, so the outcome does not depend on the
/// iteration order of the caller's map. Empty input yields an empty object.
pub fn unflatten(flat: &FlatConfig) -> Result<ConfigTree> {
    let mut root = ConfigTree::Null;

    for (path, value) in flat {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        insert(&mut root, &segments, 0, value)?;
    }

    if root.is_null() {
        return Ok(ConfigTree::object());
    }
    Ok(root)
}

/// Parses a stored value into a leaf node.
pub fn parse_leaf(value: &str) -> ConfigTree {
    if looks_like_json_container(value) {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(value) {
            return ConfigTree::Embedded(parsed);
        }
    }
    ConfigTree::string(value)
}

/// True if the value begins and ends with matching braces or brackets.
pub fn looks_like_json_container(value: &str) -> bool {
    (value.starts_with('{') && value.ends_with('}'))
        || (value.starts_with('[') && value.ends_with(']'))
}

/// A segment is an index only in canonical decimal form: `0`, or digits
/// without a leading zero. `007` stays an object key so it flattens back to
/// the same path.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    // Digits beyond usize range still count as an index; they are rejected
    // by the MAX_LIST_INDEX check.
    Some(segment.parse::<usize>().unwrap_or(usize::MAX))
}

fn prefix_of(segments: &[&str], depth: usize) -> String {
    let joined = segments[..depth].join(".");
    if joined.is_empty() {
        "<root>".to_string()
    } else {
        joined
    }
}

fn insert(node: &mut ConfigTree, segments: &[&str], depth: usize, value: &str) -> Result<()> {
    let Some(segment) = segments.get(depth) else {
        if !node.is_null() {
            return Err(DocumentError::TypeConflict {
                path: prefix_of(segments, depth),
                expected: "value",
                found: node.kind(),
            });
        }
        *node = parse_leaf(value);
        return Ok(());
    };

    // Once a position holds an object, numeric segments under it are keys.
    let index = parse_index(segment).filter(|_| !matches!(node, ConfigTree::Object(_)));
    match index {
        Some(index) => {
            if index > MAX_LIST_INDEX {
                return Err(DocumentError::IndexOutOfRange {
                    path: prefix_of(segments, depth + 1),
                    index,
                    max: MAX_LIST_INDEX,
                });
            }
            if node.is_null() {
                *node = ConfigTree::List(Vec::new());
            }
            let ConfigTree::List(items) = node else {
                return Err(DocumentError::TypeConflict {
                    path: prefix_of(segments, depth),
                    expected: "list",
                    found: node.kind(),
                });
            };
            if items.len() <= index {
                items.resize(index + 1, ConfigTree::Null);
            }
            insert(&mut items[index], segments, depth + 1, value)
        }
        None => {
            if node.is_null() {
                *node = ConfigTree::object();
            }
            let ConfigTree::Object(map) = node else {
                return Err(DocumentError::TypeConflict {
                    path: prefix_of(segments, depth),
                    expected: "object",
                    found: node.kind(),
                });
            };
            let child = map.entry(segment.to_string()).or_default();
            insert(child, segments, depth + 1, value)
        }
    }
}
