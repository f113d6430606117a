//! Tree → flat map transform.
//!
//! Object keys and list indices become dot-separated path segments; every
//! leaf is rendered to its string form because the remote store only holds
//! strings.

use std::collections::BTreeMap;

use super::error::{DocumentError, Result};
use super::tree::{ConfigTree, Scalar};
use crate::validator::{validate_configuration, ValidationIssue};

/// Flattened configuration: dotted path → string value, ordered by path.
pub type FlatConfig = BTreeMap<String, String>;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Flattens a configuration tree into dotted paths.
///
/// `Null` leaves and empty containers produce no entries. A scalar at the
/// root is stored under the empty path.
pub fn flatten(tree: &ConfigTree) -> Result<FlatConfig> {
    let mut result = FlatConfig::new();
    flatten_into(tree, String::new(), &mut result)?;
    Ok(result)
}

/// Flattens the tree and classifies every entry.
///
/// Classification failures do not abort the pass; they are returned next to
/// the flattened map so the caller can decide whether they are fatal.
pub fn flatten_and_validate(tree: &ConfigTree) -> Result<(FlatConfig, Vec<ValidationIssue>)> {
    let flat = flatten(tree)?;
    let issues = validate_configuration(&flat);
    Ok((flat, issues))
}

/// Joins a path prefix and a segment.
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, segment)
    }
}

fn flatten_into(node: &ConfigTree, prefix: String, result: &mut FlatConfig) -> Result<()> {
    match node {
        ConfigTree::Null => Ok(()),
        ConfigTree::Object(map) => {
            for (key, child) in map {
                flatten_into(child, join_path(&prefix, key), result)?;
            }
            Ok(())
        }
        ConfigTree::List(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, join_path(&prefix, &index.to_string()), result)?;
            }
            Ok(())
        }
        ConfigTree::Scalar(Scalar::Float(f)) if !f.is_finite() => Err(DocumentError::Unrenderable {
            path: prefix,
            reason: format!("non-finite number {}", f),
        }),
        ConfigTree::Scalar(scalar) => {
            result.insert(prefix, scalar.render());
            Ok(())
        }
        ConfigTree::Embedded(value) => {
            let rendered = serde_json::to_string(value).map_err(|e| DocumentError::Unrenderable {
                path: prefix.clone(),
                reason: e.to_string(),
            })?;
            result.insert(prefix, rendered);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(pairs: &[(&str, &str)]) -> FlatConfig {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_flatten_simple_object() {
        let tree = ConfigTree::from(json!({"key1": "value1", "key2": "value2"}));
        assert_eq!(
            flatten(&tree).unwrap(),
            flat(&[("key1", "value1"), ("key2", "value2")])
        );
    }

    #[test]
    fn test_flatten_nested_object() {
        let tree = ConfigTree::from(json!({
            "app": {"name": "test", "version": "1.0.0"},
            "database": {"host": "localhost", "port": 5432}
        }));
        assert_eq!(
            flatten(&tree).unwrap(),
            flat(&[
                ("app.name", "test"),
                ("app.version", "1.0.0"),
                ("database.host", "localhost"),
                ("database.port", "5432"),
            ])
        );
    }

    #[test]
    fn test_flatten_list_uses_indices() {
        let tree = ConfigTree::from(json!({"features": ["auth", "logging", "cache"]}));
        assert_eq!(
            flatten(&tree).unwrap(),
            flat(&[
                ("features.0", "auth"),
                ("features.1", "logging"),
                ("features.2", "cache"),
            ])
        );
    }

    #[test]
    fn test_flatten_mixed_scalars() {
        let tree = ConfigTree::from(json!({"enabled": true, "count": 42, "rate": 0.25, "whole": 3.0}));
        assert_eq!(
            flatten(&tree).unwrap(),
            flat(&[
                ("count", "42"),
                ("enabled", "true"),
                ("rate", "0.25"),
                ("whole", "3"),
            ])
        );
    }

    #[test]
    fn test_flatten_empty_inputs() {
        assert!(flatten(&ConfigTree::object()).unwrap().is_empty());
        assert!(flatten(&ConfigTree::Null).unwrap().is_empty());
        let tree = ConfigTree::from(json!({"a": {}, "b": [], "c": null}));
        assert!(flatten(&tree).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_root_scalar_uses_empty_path() {
        let tree = ConfigTree::string("solo");
        assert_eq!(flatten(&tree).unwrap(), flat(&[("", "solo")]));
    }

    #[test]
    fn test_flatten_embedded_is_compact_json() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(
            "rules".to_string(),
            ConfigTree::Embedded(json!({"allow": ["a", "b"], "limit": 3})),
        );
        let tree = ConfigTree::Object(map);
        assert_eq!(
            flatten(&tree).unwrap(),
            flat(&[("rules", r#"{"allow":["a","b"],"limit":3}"#)])
        );
    }

    #[test]
    fn test_flatten_rejects_non_finite_float() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("ratio".to_string(), ConfigTree::Scalar(Scalar::Float(f64::NAN)));
        let result = flatten(&ConfigTree::Object(map));
        assert!(matches!(
            result,
            Err(DocumentError::Unrenderable { ref path, .. }) if path == "ratio"
        ));
    }

    #[test]
    fn test_flatten_and_validate_collects_issues() {
        let tree = ConfigTree::from(json!({
            "feature": {"beta": "maybe", "dark_mode": "on"},
            "secrets": {"db": "@Microsoft.KeyVault(SecretUri=https://example.com/secrets/x)"},
            "plain": "value"
        }));
        let (flat, issues) = flatten_and_validate(&tree).unwrap();
        assert_eq!(flat.len(), 4);
        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["feature.beta", "secrets.db"]);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a", "b"), "a.b");
        assert_eq!(join_path("a.b", "0"), "a.b.0");
    }
}
