//! Variable specifications: which names to parse and how to typecast them.

use crate::cast::{self, TypecastError};
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Signature shared by all typecasters: raw text in, typed value or error out.
pub type CastFn = dyn Fn(&str) -> Result<Value, TypecastError> + Send + Sync;

/// How a variable's raw text is converted before storage.
#[derive(Clone)]
pub enum Typecaster {
    /// Store the raw text unchanged as [`Value::Text`].
    Identity,
    /// Apply a conversion function; a failure becomes a malformed diagnostic.
    Cast(Arc<CastFn>),
}

impl Typecaster {
    /// Wrap a conversion function or closure.
    pub fn cast<F>(cast: F) -> Self
    where
        F: Fn(&str) -> Result<Value, TypecastError> + Send + Sync + 'static,
    {
        Self::Cast(Arc::new(cast))
    }

    /// Apply this caster to a raw environment value.
    pub fn apply(&self, raw: &str) -> Result<Value, TypecastError> {
        match self {
            Self::Identity => Ok(Value::Text(raw.into())),
            Self::Cast(cast) => cast(raw),
        }
    }
}

impl fmt::Debug for Typecaster {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => formatter.write_str("Identity"),
            Self::Cast(_) => formatter.write_str("Cast(..)"),
        }
    }
}

/// The set of variables a caller expects, each with its typecaster.
///
/// Names are case-sensitive and must match the unprefixed form of the
/// environment variable exactly. Declaration order is irrelevant.
#[derive(Debug, Clone, Default)]
pub struct EnvSpec {
    entries: BTreeMap<Box<str>, Typecaster>,
}

impl EnvSpec {
    /// Empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with an explicit typecaster.
    #[must_use]
    pub fn var(mut self, name: impl Into<Box<str>>, caster: Typecaster) -> Self {
        self.entries.insert(name.into(), caster);
        self
    }

    /// Declare a variable stored as raw text (identity typecaster).
    #[must_use]
    pub fn text(self, name: impl Into<Box<str>>) -> Self {
        self.var(name, Typecaster::Identity)
    }

    /// Declare an integer variable using [`cast::int`].
    #[must_use]
    pub fn int(self, name: impl Into<Box<str>>) -> Self {
        self.var(name, Typecaster::cast(cast::int))
    }

    /// Declare a float variable using [`cast::float`].
    #[must_use]
    pub fn float(self, name: impl Into<Box<str>>) -> Self {
        self.var(name, Typecaster::cast(cast::float))
    }

    /// Declare a booleanish variable using [`cast::is_yesish`].
    #[must_use]
    pub fn yesish(self, name: impl Into<Box<str>>) -> Self {
        self.var(name, Typecaster::cast(cast::is_yesish))
    }

    /// Declared variable names, ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(AsRef::as_ref)
    }

    /// Number of declared variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no variables are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn caster(&self, name: &str) -> Option<&Typecaster> {
        self.entries.get(name)
    }
}
