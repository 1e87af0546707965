//! Nested trees built from dotted column names.
//!
//! A result row such as `Id = 1, Address.City = "Oslo"` becomes
//! `{Id: 1, Address: {City: "Oslo"}}`. Keys split on the first dot at every
//! level, and sibling columns sharing a prefix are deep-merged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// How null-valued columns are represented in a nested row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPolicy {
    /// Null columns produce no key at all.
    #[default]
    Omit,
    /// Null columns become explicit `null` leaves.
    Explicit,
}

/// Two columns disagree about the shape of the same path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column path `{0}` is both a value and a nested object")]
pub struct ShapeConflict(pub String);

/// A value or a mapping of keys to further nested values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Nested {
    Leaf(JsonValue),
    Node(BTreeMap<String, Nested>),
}

impl Default for Nested {
    fn default() -> Self {
        Nested::Node(BTreeMap::new())
    }
}

impl Nested {
    /// Build the single-branch tree for one column.
    ///
    /// `("A.B.C", v)` yields `{A: {B: {C: v}}}`. Only the first dot is
    /// consumed per level, so empty segments survive as empty keys.
    pub fn from_column(key: &str, value: JsonValue) -> Self {
        let mut node = BTreeMap::new();
        match key.split_once('.') {
            Some((head, rest)) => {
                node.insert(head.to_string(), Nested::from_column(rest, value));
            }
            None => {
                node.insert(key.to_string(), Nested::Leaf(value));
            }
        }
        Nested::Node(node)
    }

    /// Nest every column of a row and merge the branches together.
    pub fn from_row<I, K>(columns: I, nulls: NullPolicy) -> Result<Self, ShapeConflict>
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: AsRef<str>,
    {
        let mut row = Nested::default();
        for (key, value) in columns {
            if value.is_null() && nulls == NullPolicy::Omit {
                continue;
            }
            row.merge(Nested::from_column(key.as_ref(), value))?;
        }
        Ok(row)
    }

    /// Nest a JSON object whose keys are column names.
    ///
    /// Anything other than an object is treated as a single leaf.
    pub fn from_json_row(row: JsonValue, nulls: NullPolicy) -> Result<Self, ShapeConflict> {
        match row {
            JsonValue::Object(map) => Nested::from_row(map, nulls),
            other => Ok(Nested::Leaf(other)),
        }
    }

    /// Deep-merge `other` into `self`.
    ///
    /// Nodes merge key by key. A null leaf yields to a node; any other
    /// collision involving a leaf is a [`ShapeConflict`].
    pub fn merge(&mut self, other: Nested) -> Result<(), ShapeConflict> {
        self.merge_at(other, "")
    }

    fn merge_at(&mut self, other: Nested, path: &str) -> Result<(), ShapeConflict> {
        match other {
            Nested::Node(theirs) => match self {
                Nested::Node(mine) => {
                    for (key, value) in theirs {
                        let child_path = if path.is_empty() {
                            key.clone()
                        } else {
                            format!("{path}.{key}")
                        };
                        match mine.get_mut(&key) {
                            Some(existing) => existing.merge_at(value, &child_path)?,
                            None => {
                                mine.insert(key, value);
                            }
                        }
                    }
                    Ok(())
                }
                Nested::Leaf(JsonValue::Null) => {
                    *self = Nested::Node(theirs);
                    Ok(())
                }
                Nested::Leaf(_) => Err(ShapeConflict(path.to_string())),
            },
            Nested::Leaf(JsonValue::Null) if matches!(self, Nested::Node(_)) => Ok(()),
            Nested::Leaf(_) => Err(ShapeConflict(path.to_string())),
        }
    }

    /// Look up a dotted path, e.g. `"Address.City"`.
    pub fn get(&self, path: &str) -> Option<&Nested> {
        path.split('.').try_fold(self, |current, segment| match current {
            Nested::Node(map) => map.get(segment),
            Nested::Leaf(_) => None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Nested::Leaf(_))
    }

    /// Convert into a plain JSON value.
    pub fn into_json(self) -> JsonValue {
        match self {
            Nested::Leaf(value) => value,
            Nested::Node(map) => {
                JsonValue::Object(map.into_iter().map(|(k, v)| (k, v.into_json())).collect())
            }
        }
    }
}

impl From<Nested> for JsonValue {
    fn from(nested: Nested) -> Self {
        nested.into_json()
    }
}
