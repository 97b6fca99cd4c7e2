//! Process-environment boundary.
//!
//! The core parser only ever sees an explicit snapshot map, so tests never
//! touch the real environment. These helpers are the one place that reads
//! the live process environment table.

use crate::env::Environment;
use crate::spec::EnvSpec;
use std::collections::BTreeMap;

/// Snapshot the process environment as a sorted name/value map.
///
/// Entries whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn process_snapshot() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Parse `spec` against the live process environment.
///
/// Equivalent to [`Environment::parse`] over [`process_snapshot`]; emits a
/// single debug event with the diagnostic counts. Reporting and exit
/// decisions stay with the caller.
#[must_use]
pub fn from_process(prefix: &str, spec: &EnvSpec) -> Environment {
    let snapshot = process_snapshot();
    let environment = Environment::parse(prefix, spec, &snapshot);
    tracing::debug!(
        prefix,
        missing = environment.missing().len(),
        malformed = environment.malformed().len(),
        "parsed process environment"
    );
    environment
}
