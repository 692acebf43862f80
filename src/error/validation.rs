//! Structured validation errors and warnings
//!
//! Every problem found while validating a configuration document is
//! reported against the dotted path of the offending field, so that a
//! caller can fix all of them in one pass.

use core::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Category of a hard validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ValidationErrorKind {
    /// Value is not a member of the required closed vocabulary
    UnknownValue,
    /// Two fields contradict each other
    ConflictingFields,
    /// A field that is only kept to be rejected holds a value
    DeprecatedField,
    /// Value cannot be coerced to the declared shape
    TypeMismatch,
}

impl fmt::Display for ValidationErrorKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match *self {
            Self::UnknownValue => "unknown value",
            Self::ConflictingFields => "conflicting fields",
            Self::DeprecatedField => "deprecated field",
            Self::TypeMismatch => "type mismatch",
        };
        f.write_str(text)
    }
}

/// A single hard validation failure
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Dotted path of the field, e.g. `bot.automerge` or `channels.targets[0]`
    pub path: String,
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Raw value as written by the user, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    #[must_use]
    pub fn new(path: impl Into<String>, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
            value: None,
        }
    }

    /// Value outside of an enumerated set; `null` is left out of the listing
    #[must_use]
    pub fn unknown_value(path: impl Into<String>, value: &Value, allowed: &[Value]) -> Self {
        let choices = allowed
            .iter()
            .filter(|choice| !choice.is_null())
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            path: path.into(),
            kind: ValidationErrorKind::UnknownValue,
            message: format!("{} is not one of {choices}", display_value(value)),
            value: Some(value.clone()),
        }
    }

    /// Value of the wrong shape
    #[must_use]
    pub fn type_mismatch(path: impl Into<String>, expected: &str, value: &Value) -> Self {
        Self {
            path: path.into(),
            kind: ValidationErrorKind::TypeMismatch,
            message: format!("expected {expected}, got {}", describe_value(value)),
            value: Some(value.clone()),
        }
    }

    /// Two fields that cannot both hold their current values
    #[must_use]
    pub fn conflicting(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ValidationErrorKind::ConflictingFields,
            message: message.into(),
            value: None,
        }
    }

    /// A deprecated field was given a value
    #[must_use]
    pub fn deprecated(path: impl Into<String>, value: &Value, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ValidationErrorKind::DeprecatedField,
            message: message.into(),
            value: Some(value.clone()),
        }
    }

    /// Attach the raw value the error refers to
    #[must_use]
    pub fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.clone());
        self
    }
}

/// Join a dotted path and a mapping key
#[must_use]
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// A non-fatal finding; validation still succeeds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// All hard failures of one validation call
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Find the first error reported against `path`
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} error(s):",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = core::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Short name of a raw value's shape, used in type mismatch messages
#[must_use]
pub fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(number) if number.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Render a raw value for messages; strings are single-quoted
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{text}'"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_lists_every_error() {
        let errors = ValidationErrors::new(vec![
            ValidationError::type_mismatch("choco", "a list of strings", &json!(3)),
            ValidationError::deprecated("matrix", &json!({}), "Migrate matrix."),
        ]);

        let text = errors.to_string();
        assert!(text.starts_with("Configuration validation failed with 2 error(s):"));
        assert!(text.contains("\n  - choco: "));
        assert!(text.contains("\n  - matrix: Migrate matrix."));
        assert_eq!(errors.at("matrix").map(|error| error.kind), Some(ValidationErrorKind::DeprecatedField));
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(describe_value(&json!(1.5)), "a float");
        assert_eq!(describe_value(&json!(1)), "an integer");
        assert_eq!(display_value(&json!("pip")), "'pip'");
        assert_eq!(display_value(&json!([1])), "[1]");
    }
}
