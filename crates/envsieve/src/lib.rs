//! # envsieve
//!
//! Parsing and validation of environment variables.
//!
//! A caller declares which variables it cares about and how to typecast
//! them; the parser evaluates that specification against a snapshot of the
//! environment and aggregates every problem instead of failing on the first
//! one, so all misconfiguration can be reported at once.
//!
//! ```
//! use envsieve::{EnvSpec, Environment};
//! use std::collections::BTreeMap;
//!
//! let environ = BTreeMap::from([
//!     ("FOO".to_owned(), "42".to_owned()),
//!     ("BAR_BAZ".to_owned(), "buz".to_owned()),
//!     ("BAR_BLOO_BLOO".to_owned(), "yes".to_owned()),
//!     ("BAD".to_owned(), "to the bone".to_owned()),
//! ]);
//!
//! let spec = EnvSpec::new()
//!     .int("FOO")
//!     .text("BAR_BAZ")
//!     .yesish("BAR_BLOO_BLOO")
//!     .text("BLAH")
//!     .int("BAD");
//!
//! let env = Environment::parse("", &spec, &environ);
//!
//! // Attribute names are lowercased; one level of namespacing is applied.
//! assert_eq!(env.get("foo")?.as_int(), Some(42));
//! assert_eq!(env.get("bar.baz")?.as_text(), Some("buz"));
//! assert_eq!(env.get("bar.bloo_bloo")?.as_bool(), Some(true));
//!
//! // Problems are aggregated, not raised.
//! assert_eq!(env.missing().first().map(AsRef::as_ref), Some("BLAH"));
//! assert_eq!(env.malformed().first().map(|entry| entry.var.as_ref()), Some("BAD"));
//! # Ok::<(), envsieve::AccessError>(())
//! ```

/// Built-in typecasters and the typecast failure type.
pub mod cast;
/// Environment parsing and the parsed result object.
pub mod env;
/// Process-environment boundary helpers.
pub mod load;
/// Variable specifications and typecasters.
pub mod spec;
/// Typed values and the parsed attribute tree.
pub mod value;

pub use cast::TypecastError;
pub use env::{AccessError, Environment, MalformedVar};
pub use load::{from_process, process_snapshot};
pub use spec::{CastFn, EnvSpec, Typecaster};
pub use value::{EnvGroup, EnvNode, Value};

/// Returns the crate version.
#[must_use]
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
