//! Typed values and the parsed attribute tree.

use crate::env::AccessError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A successfully typecast environment value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Raw text stored unchanged (identity typecaster).
    Text(Box<str>),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Borrow the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Float payload, if this is a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Bool(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text.into_boxed_str())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A one-level namespace: the variables sharing a first name segment,
/// keyed by the lowercased remainder of their names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnvGroup {
    values: BTreeMap<Box<str>, Value>,
}

impl EnvGroup {
    /// Look up an attribute inside this group.
    pub fn get(&self, attribute: &str) -> Result<&Value, AccessError> {
        self.values
            .get(attribute)
            .ok_or_else(|| AccessError::NoSuchAttribute {
                attribute: attribute.to_owned(),
            })
    }

    /// True when the group holds an attribute with this name.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.values.contains_key(attribute)
    }

    /// Attributes in this group, ascending by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(attribute, value)| (attribute.as_ref(), value))
    }

    /// Number of attributes in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the group holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, attribute: Box<str>, value: Value) {
        self.values.insert(attribute, value);
    }
}

/// A parsed top-level attribute: either a scalar value or a namespace group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvNode {
    /// Scalar stored directly under its lowercased name.
    Value(Value),
    /// Namespace group created by the first successful namespaced write.
    Group(EnvGroup),
}

impl EnvNode {
    /// Borrow the scalar value, if this node is one.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Group(_) => None,
        }
    }

    /// Borrow the group, if this node is one.
    #[must_use]
    pub const fn as_group(&self) -> Option<&EnvGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Value(_) => None,
        }
    }
}
