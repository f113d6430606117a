//! In-memory representation of a hierarchical configuration document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A terminal value in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Canonical string form used as the flattened value.
    ///
    /// Floats use the shortest representation that round-trips and never
    /// switch to exponent notation, so `3.0` renders as `3` and `1e21` as
    /// `1000000000000000000000`.
    pub fn render(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }
}

/// A configuration document: scalars, lists and objects nested arbitrarily.
///
/// `Null` marks an absent value. It is what JSON `null` parses to and the
/// placeholder used for holes when a list is rebuilt from sparse indices.
/// `Embedded` carries an opaque JSON object or array that is stored as a
/// single compact string instead of being walked.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigTree {
    #[default]
    Null,
    Scalar(Scalar),
    List(Vec<ConfigTree>),
    Object(BTreeMap<String, ConfigTree>),
    Embedded(Value),
}

impl ConfigTree {
    /// Creates a string leaf.
    pub fn string(value: impl Into<String>) -> Self {
        ConfigTree::Scalar(Scalar::String(value.into()))
    }

    /// Creates an empty object node.
    pub fn object() -> Self {
        ConfigTree::Object(BTreeMap::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigTree::Null)
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigTree::Null => "null",
            ConfigTree::Scalar(_) => "scalar",
            ConfigTree::List(_) => "list",
            ConfigTree::Object(_) => "object",
            ConfigTree::Embedded(_) => "embedded JSON",
        }
    }

    /// Looks up a child by dotted path (`database.port`, `features.0`).
    pub fn get_path(&self, path: &str) -> Option<&ConfigTree> {
        path.split('.').try_fold(self, |node, segment| match node {
            ConfigTree::Object(map) => map.get(segment),
            ConfigTree::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Converts the tree into a plain JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            ConfigTree::Null => Value::Null,
            ConfigTree::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            ConfigTree::Scalar(Scalar::Int(i)) => Value::from(*i),
            ConfigTree::Scalar(Scalar::UInt(u)) => Value::from(*u),
            ConfigTree::Scalar(Scalar::Float(f)) => Value::from(*f),
            ConfigTree::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            ConfigTree::List(items) => Value::Array(items.iter().map(ConfigTree::to_json).collect()),
            ConfigTree::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
            ConfigTree::Embedded(value) => value.clone(),
        }
    }
}

impl From<Value> for ConfigTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigTree::Null,
            Value::Bool(b) => ConfigTree::Scalar(Scalar::Bool(b)),
            Value::Number(n) => {
                let scalar = if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt(u)
                } else {
                    Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
                };
                ConfigTree::Scalar(scalar)
            }
            Value::String(s) => ConfigTree::Scalar(Scalar::String(s)),
            Value::Array(items) => ConfigTree::List(items.into_iter().map(ConfigTree::from).collect()),
            Value::Object(map) => ConfigTree::Object(
                map.into_iter()
                    .map(|(key, child)| (key, ConfigTree::from(child)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigTree::Null => serializer.serialize_unit(),
            ConfigTree::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            ConfigTree::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            ConfigTree::Scalar(Scalar::UInt(u)) => serializer.serialize_u64(*u),
            ConfigTree::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            ConfigTree::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            ConfigTree::List(items) => serializer.collect_seq(items),
            ConfigTree::Object(map) => serializer.collect_map(map),
            ConfigTree::Embedded(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ConfigTree::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_classifies_numbers() {
        let tree = ConfigTree::from(json!({"port": 5432, "rate": 2.75, "big": u64::MAX}));

        assert_eq!(
            tree.get_path("port"),
            Some(&ConfigTree::Scalar(Scalar::Int(5432)))
        );
        assert_eq!(
            tree.get_path("rate"),
            Some(&ConfigTree::Scalar(Scalar::Float(2.75)))
        );
        assert_eq!(
            tree.get_path("big"),
            Some(&ConfigTree::Scalar(Scalar::UInt(u64::MAX)))
        );
    }

    #[test]
    fn test_scalar_render() {
        assert_eq!(Scalar::Bool(true).render(), "true");
        assert_eq!(Scalar::Int(-42).render(), "-42");
        assert_eq!(Scalar::Float(3.0).render(), "3");
        assert_eq!(Scalar::Float(0.1).render(), "0.1");
        assert_eq!(Scalar::Float(1e21).render(), "1000000000000000000000");
    }

    #[test]
    fn test_get_path_through_lists() {
        let tree = ConfigTree::from(json!({"servers": [{"host": "a"}, {"host": "b"}]}));
        assert_eq!(tree.get_path("servers.1.host"), Some(&ConfigTree::string("b")));
        assert_eq!(tree.get_path("servers.2.host"), None);
        assert_eq!(tree.get_path("servers.x"), None);
    }

    #[test]
    fn test_serialize_matches_json_form() {
        let source = json!({"a": {"b": [1, "two", null, true]}, "c": 2.5});
        let tree = ConfigTree::from(source.clone());
        assert_eq!(serde_json::to_value(&tree).unwrap(), source);
        assert_eq!(tree.to_json(), source);
    }
}
