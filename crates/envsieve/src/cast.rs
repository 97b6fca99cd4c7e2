//! Built-in typecasters and the typecast failure type.

use crate::value::Value;
use std::fmt;

/// A typecaster failure: a category name plus the caster's own description.
///
/// Displays as `"<kind>: <detail>"`; malformed diagnostics carry this
/// rendering verbatim so the specific failure reason is never swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypecastError {
    kind: Box<str>,
    detail: String,
}

impl TypecastError {
    /// Build an error from a failure category and a detail message.
    pub fn new(kind: impl Into<Box<str>>, detail: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Failure category (e.g. `ParseIntError`).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Human-readable failure description from the typecaster.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for TypecastError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for TypecastError {}

/// Cast to a signed integer.
pub fn int(raw: &str) -> Result<Value, TypecastError> {
    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|error| TypecastError::new("ParseIntError", error.to_string()))
}

/// Cast to a floating point number.
pub fn float(raw: &str) -> Result<Value, TypecastError> {
    raw.parse::<f64>()
        .map(Value::Float)
        .map_err(|error| TypecastError::new("ParseFloatError", error.to_string()))
}

/// Cast booleanish text to a boolean.
///
/// Returns `true` when the value is `1`, `true`, or `yes` (case-insensitive)
/// and `false` for every other string. Never fails: this caster only accepts
/// text, and the `&str` parameter makes non-text input unrepresentable.
pub fn is_yesish(raw: &str) -> Result<Value, TypecastError> {
    let lowered = raw.to_lowercase();
    Ok(Value::Bool(matches!(
        lowered.as_str(),
        "1" | "true" | "yes"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parses_decimal_text() -> Result<(), TypecastError> {
        assert_eq!(int("42")?, Value::Int(42));
        assert_eq!(int("-7")?, Value::Int(-7));
        Ok(())
    }

    #[test]
    fn int_failure_keeps_the_kind_and_detail() {
        let error = int("to the bone").err();
        assert!(matches!(&error, Some(error) if error.kind() == "ParseIntError"));
        assert_eq!(
            error.map(|error| error.to_string()).as_deref(),
            Some("ParseIntError: invalid digit found in string")
        );
    }

    #[test]
    fn float_parses_decimal_text() -> Result<(), TypecastError> {
        assert_eq!(float("2.5")?, Value::Float(2.5));
        Ok(())
    }

    #[test]
    fn float_failure_uses_its_own_kind() {
        let error = float("nope").err();
        assert!(matches!(error, Some(error) if error.kind() == "ParseFloatError"));
    }

    #[test]
    fn is_yesish_accepts_affirmative_text() -> Result<(), TypecastError> {
        assert_eq!(is_yesish("1")?, Value::Bool(true));
        assert_eq!(is_yesish("TrUe")?, Value::Bool(true));
        assert_eq!(is_yesish("YeS")?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn is_yesish_rejects_everything_else() -> Result<(), TypecastError> {
        assert_eq!(is_yesish("0")?, Value::Bool(false));
        assert_eq!(is_yesish("FaLsE")?, Value::Bool(false));
        assert_eq!(is_yesish("No")?, Value::Bool(false));
        assert_eq!(is_yesish("Oh yeah junk")?, Value::Bool(false));
        assert_eq!(is_yesish("")?, Value::Bool(false));
        Ok(())
    }
}
