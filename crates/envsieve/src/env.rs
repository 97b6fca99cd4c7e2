//! Environment parsing and the parsed result object.
//!
//! This module keeps parsing:
//! - total (missing and malformed variables become data, never errors)
//! - deterministic (all output is sorted by variable name)
//! - isolated (inputs are copied on entry and never mutated)

use crate::spec::EnvSpec;
use crate::value::{EnvGroup, EnvNode, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A variable that was present in the environment but failed typecasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedVar {
    /// Variable name as found in the environment (prefixed form).
    pub var: Box<str>,
    /// Diagnostic in `"<kind>: <detail>"` form, verbatim from the caster.
    pub message: String,
}

/// Lookup failures on the parsed result.
///
/// These are the only errors this crate propagates: they indicate the caller
/// asked for an attribute that was never successfully parsed. Consult
/// [`Environment::missing`] and [`Environment::malformed`] to tell "absent"
/// apart from "present but invalid".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No attribute with this name was parsed.
    NoSuchAttribute {
        /// Dotted attribute path that failed to resolve.
        attribute: String,
    },
    /// A dotted path traversed an attribute that is not a namespace group.
    NotAGroup {
        /// Name of the scalar attribute that was addressed as a group.
        attribute: String,
    },
    /// A namespace group was addressed as a scalar value.
    NotAValue {
        /// Name of the group attribute that was addressed as a scalar.
        attribute: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchAttribute { attribute } => {
                write!(formatter, "no such attribute: {attribute}")
            },
            Self::NotAGroup { attribute } => {
                write!(formatter, "{attribute} is not a namespace group")
            },
            Self::NotAValue { attribute } => {
                write!(formatter, "{attribute} is a namespace group, not a value")
            },
        }
    }
}

impl std::error::Error for AccessError {}

/// A parsed subset of a process environment.
///
/// Built once, synchronously, by [`Environment::parse`]. The prefix, the
/// snapshot copy and the diagnostics are immutable afterwards; parsed values
/// may be layered over with [`Environment::set`].
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    prefix: Box<str>,
    environ: BTreeMap<Box<str>, Box<str>>,
    values: BTreeMap<Box<str>, EnvNode>,
    missing: Vec<Box<str>>,
    malformed: Vec<MalformedVar>,
}

impl Environment {
    /// Parse `spec` against `environ`.
    ///
    /// Only names starting with `prefix` (which may be empty) are eligible;
    /// the prefix is stripped before spec matching and before storage.
    /// Stored attribute names are lowercased, and a name containing `_` is
    /// split once into `namespace.remainder` (one level only, the remainder
    /// is never split further). Environment entries outside the spec are
    /// ignored entirely.
    ///
    /// Parsing is total: a spec variable with no environment entry lands in
    /// [`missing`](Self::missing), one whose typecast failed lands in
    /// [`malformed`](Self::malformed) with the caster's own message, and one
    /// bad variable never aborts parsing of the rest. The caller's map is
    /// copied on entry; mutating it afterwards does not change this result.
    ///
    /// When distinct spec keys map to the same storage slot (case-folded
    /// duplicates, or a scalar name that is also another name's namespace),
    /// the later write in name-sorted order wins and a namespaced write
    /// replaces a scalar occupying its slot.
    #[must_use]
    pub fn parse(prefix: &str, spec: &EnvSpec, environ: &BTreeMap<String, String>) -> Self {
        let environ: BTreeMap<Box<str>, Box<str>> = environ
            .iter()
            .map(|(name, value)| (name.as_str().into(), value.as_str().into()))
            .collect();

        // Set difference; spec names iterate sorted, so `missing` is too.
        let missing: Vec<Box<str>> = spec
            .names()
            .filter(|name| !environ.contains_key(format!("{prefix}{name}").as_str()))
            .map(Into::into)
            .collect();

        let mut values: BTreeMap<Box<str>, EnvNode> = BTreeMap::new();
        let mut malformed = Vec::new();

        // Snapshot iteration is name-sorted, so `malformed` comes out sorted
        // and slot collisions resolve the same way on every run.
        for (name, raw) in &environ {
            let Some(key) = name.strip_prefix(prefix) else {
                continue;
            };
            let Some(caster) = spec.caster(key) else {
                continue;
            };
            match caster.apply(raw) {
                Err(error) => malformed.push(MalformedVar {
                    var: name.clone(),
                    message: error.to_string(),
                }),
                Ok(value) => store(&mut values, key, value),
            }
        }

        Self {
            prefix: prefix.into(),
            environ,
            values,
            missing,
            malformed,
        }
    }

    /// Prefix the parser matched against.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The private environment snapshot taken at construction.
    #[must_use]
    pub const fn snapshot(&self) -> &BTreeMap<Box<str>, Box<str>> {
        &self.environ
    }

    /// The parsed attribute tree, keyed by lowercased top-level name.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<Box<str>, EnvNode> {
        &self.values
    }

    /// Spec variables with no matching environment entry, ascending by name.
    #[must_use]
    pub fn missing(&self) -> &[Box<str>] {
        &self.missing
    }

    /// Variables whose typecast failed, ascending by name.
    #[must_use]
    pub fn malformed(&self) -> &[MalformedVar] {
        &self.malformed
    }

    /// Resolve a value by attribute path: `"port"` for a top-level value,
    /// `"db.host"` for a value inside the `db` namespace.
    pub fn get(&self, attribute: &str) -> Result<&Value, AccessError> {
        match attribute.split_once('.') {
            None => match self.values.get(attribute) {
                Some(EnvNode::Value(value)) => Ok(value),
                Some(EnvNode::Group(_)) => Err(AccessError::NotAValue {
                    attribute: attribute.to_owned(),
                }),
                None => Err(AccessError::NoSuchAttribute {
                    attribute: attribute.to_owned(),
                }),
            },
            Some((namespace, rest)) => {
                let group = self.group(namespace)?;
                group.get(rest).map_err(|_| AccessError::NoSuchAttribute {
                    attribute: attribute.to_owned(),
                })
            },
        }
    }

    /// Borrow a namespace group by name.
    pub fn group(&self, namespace: &str) -> Result<&EnvGroup, AccessError> {
        match self.values.get(namespace) {
            Some(EnvNode::Group(group)) => Ok(group),
            Some(EnvNode::Value(_)) => Err(AccessError::NotAGroup {
                attribute: namespace.to_owned(),
            }),
            None => Err(AccessError::NoSuchAttribute {
                attribute: namespace.to_owned(),
            }),
        }
    }

    /// Insert or overwrite a parsed value after construction (configuration
    /// layering on top of the parsed output).
    ///
    /// A dotted path addresses one namespace level and creates the group if
    /// it does not exist yet; a write through a scalar slot converts it into
    /// a group. Diagnostics and the snapshot are not affected.
    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) {
        let value = value.into();
        match attribute.split_once('.') {
            None => {
                self.values.insert(attribute.into(), EnvNode::Value(value));
            },
            Some((namespace, rest)) => {
                insert_into_group(&mut self.values, namespace.into(), rest.into(), value);
            },
        }
    }
}

/// Store a successfully cast value under its attribute path.
///
/// The unprefixed key is split once on `_`; when both sides are non-empty
/// the first segment (lowercased) names the namespace and the remainder
/// (lowercased, underscores intact) names the attribute inside it. Degenerate
/// keys such as `_FOO` or `FOO_` stay top-level.
fn store(values: &mut BTreeMap<Box<str>, EnvNode>, key: &str, value: Value) {
    match key.split_once('_') {
        Some((namespace, rest)) if !namespace.is_empty() && !rest.is_empty() => {
            insert_into_group(
                values,
                namespace.to_lowercase().into_boxed_str(),
                rest.to_lowercase().into_boxed_str(),
                value,
            );
        },
        _ => {
            values.insert(key.to_lowercase().into_boxed_str(), EnvNode::Value(value));
        },
    }
}

fn insert_into_group(
    values: &mut BTreeMap<Box<str>, EnvNode>,
    namespace: Box<str>,
    attribute: Box<str>,
    value: Value,
) {
    let node = values
        .entry(namespace)
        .or_insert_with(|| EnvNode::Group(EnvGroup::default()));
    if !matches!(node, EnvNode::Group(_)) {
        *node = EnvNode::Group(EnvGroup::default());
    }
    if let EnvNode::Group(group) = node {
        group.insert(attribute, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn environ(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn sample_environ() -> BTreeMap<String, String> {
        environ(&[
            ("FOO", "42"),
            ("BAR_BAZ", "buz"),
            ("BAR_BLOO_BLOO", "yes"),
            ("BAD", "to the bone"),
        ])
    }

    #[test]
    fn partitions_spec_keys_into_parsed_missing_and_malformed()
    -> Result<(), Box<dyn Error>> {
        let spec = EnvSpec::new().int("FOO").text("BLAH").int("BAD");
        let env = Environment::parse("", &spec, &sample_environ());

        assert_eq!(env.get("foo")?, &Value::Int(42));
        assert_eq!(
            env.missing().iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            vec!["BLAH"]
        );
        assert_eq!(
            env.malformed(),
            &[MalformedVar {
                var: "BAD".into(),
                message: "ParseIntError: invalid digit found in string".to_owned(),
            }]
        );
        Ok(())
    }

    #[test]
    fn prefix_is_stripped_before_matching_and_storage() -> Result<(), Box<dyn Error>> {
        let spec = EnvSpec::new().text("BAZ").yesish("BLOO_BLOO");
        let env = Environment::parse("BAR_", &spec, &sample_environ());

        assert_eq!(env.get("baz")?, &Value::from("buz"));
        assert_eq!(env.get("bloo_bloo")?, &Value::Bool(true));
        assert!(env.missing().is_empty());
        assert!(env.malformed().is_empty());
        Ok(())
    }

    #[test]
    fn namespacing_splits_exactly_once() -> Result<(), Box<dyn Error>> {
        let spec = EnvSpec::new().text("A_B_C");
        let env = Environment::parse("", &spec, &environ(&[("A_B_C", "x")]));

        let group = env.group("a")?;
        assert_eq!(group.get("b_c")?, &Value::from("x"));
        // the remainder keeps its underscore, no second level exists
        assert!(matches!(
            group.get("b").err(),
            Some(AccessError::NoSuchAttribute { .. })
        ));
        Ok(())
    }

    #[test]
    fn environment_entries_outside_the_spec_are_ignored() {
        let spec = EnvSpec::new().text("FOO");
        let env = Environment::parse("", &spec, &environ(&[("FOO_BAR_BAZ", "42")]));

        assert_eq!(
            env.missing().iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            vec!["FOO"]
        );
        assert!(env.values().is_empty());
        assert!(env.malformed().is_empty());
    }

    #[test]
    fn malformed_variables_never_create_a_namespace() {
        let spec = EnvSpec::new().int("FOO_BAR_BAZ");
        let env = Environment::parse("", &spec, &environ(&[("FOO_BAR_BAZ", "blah")]));

        assert!(matches!(
            env.group("foo").err(),
            Some(AccessError::NoSuchAttribute { .. })
        ));
        assert_eq!(env.malformed().len(), 1);
        assert!(env.values().is_empty());
    }

    #[test]
    fn malformed_records_the_prefixed_name_as_found() {
        let spec = EnvSpec::new().int("PORT");
        let env = Environment::parse("APP_", &spec, &environ(&[("APP_PORT", "eighty")]));

        assert_eq!(env.malformed().first().map(|entry| entry.var.as_ref()), Some("APP_PORT"));
    }

    #[test]
    fn caller_map_is_unchanged_and_later_mutation_has_no_effect() {
        let spec = EnvSpec::new().int("FOO");
        let mut caller = sample_environ();
        let before = caller.clone();

        let env = Environment::parse("", &spec, &caller);
        assert_eq!(caller, before);

        caller.insert("FOO".to_owned(), "7".to_owned());
        assert_eq!(env.get("foo").ok(), Some(&Value::Int(42)));
        assert_eq!(env.snapshot().get("FOO").map(AsRef::as_ref), Some("42"));
    }

    #[test]
    fn parsing_twice_yields_identical_results() {
        let spec = EnvSpec::new().int("FOO").text("BLAH").int("BAD").text("BAR_BAZ");
        let first = Environment::parse("", &spec, &sample_environ());
        let second = Environment::parse("", &spec, &sample_environ());
        assert_eq!(first, second);
    }

    #[test]
    fn access_failures_name_the_attribute() {
        let spec = EnvSpec::new().text("FOO").text("BAR_BAZ");
        let env = Environment::parse("", &spec, &sample_environ());

        assert!(matches!(
            env.get("nope").err(),
            Some(AccessError::NoSuchAttribute { attribute }) if attribute == "nope"
        ));
        assert!(matches!(
            env.get("foo.x").err(),
            Some(AccessError::NotAGroup { attribute }) if attribute == "foo"
        ));
        assert!(matches!(
            env.get("bar").err(),
            Some(AccessError::NotAValue { attribute }) if attribute == "bar"
        ));
        assert!(matches!(
            env.group("foo").err(),
            Some(AccessError::NotAGroup { .. })
        ));
    }

    #[test]
    fn set_layers_values_over_the_parsed_result() -> Result<(), Box<dyn Error>> {
        let spec = EnvSpec::new().int("FOO");
        let mut env = Environment::parse("", &spec, &sample_environ());

        env.set("foo", 7);
        env.set("extra", "added");
        env.set("db.host", "localhost");

        assert_eq!(env.get("foo")?, &Value::Int(7));
        assert_eq!(env.get("extra")?, &Value::from("added"));
        assert_eq!(env.get("db.host")?, &Value::from("localhost"));
        // diagnostics are untouched by layering
        assert!(env.missing().is_empty());
        assert!(env.malformed().is_empty());
        Ok(())
    }

    #[test]
    fn namespaced_write_converts_a_scalar_slot_deterministically()
    -> Result<(), Box<dyn Error>> {
        // FOO sorts before FOO_X, so the scalar is written first and the
        // group replaces it.
        let spec = EnvSpec::new().text("FOO").text("FOO_X");
        let env = Environment::parse("", &spec, &environ(&[("FOO", "a"), ("FOO_X", "b")]));

        assert_eq!(env.group("foo")?.get("x")?, &Value::from("b"));
        Ok(())
    }

    #[test]
    fn empty_prefix_matches_everything_and_empty_spec_matches_nothing() {
        let env = Environment::parse("", &EnvSpec::new(), &sample_environ());
        assert!(env.values().is_empty());
        assert!(env.missing().is_empty());
        assert!(env.malformed().is_empty());
    }
}
