//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating text inputs with
//! required-ness, length, email, pattern and enumeration constraints.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueKind, Issues};
use crate::path::FieldPath;

use super::traits::{value_type_name, SchemaLike};

const DEFAULT_REQUIRED_MESSAGE: &str = "value is required";
const DEFAULT_TYPE_MESSAGE: &str = "expected string";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A constraint applied to present string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Email { message: String },
    Pattern { regex: Regex, message: String },
    OneOf { values: Vec<String>, message: String },
}

/// A schema for validating string values.
///
/// Form inputs arrive as `null` when untouched and as `""` when cleared, so
/// both count as absent: they produce exactly one required issue and skip
/// the constraints. A present string is checked against every constraint and
/// every failure is reported, in declaration order.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let password = Schema::string()
///     .required("auth.validation.required")
///     .min(8, "auth.validation.passwordLength");
///
/// let result = password.validate(&json!(""), &FieldPath::from_field("password"));
/// let issues = result.into_result().unwrap_err();
/// assert_eq!(issues.first().message, "auth.validation.required");
///
/// let result = password.validate(&json!("abc"), &FieldPath::from_field("password"));
/// let issues = result.into_result().unwrap_err();
/// assert_eq!(issues.first().message, "auth.validation.passwordLength");
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    required_message: Option<String>,
    type_message: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            required_message: None,
            type_message: None,
        }
    }

    /// Sets the message reported when the value is absent.
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required_message = Some(message.into());
        self
    }

    /// Sets the message reported when the value is not a string.
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// The string must have at least `min` characters (Unicode scalar values).
    pub fn min(mut self, min: usize, message: impl Into<String>) -> Self {
        self.constraints.push(StringConstraint::MinLength {
            min,
            message: message.into(),
        });
        self
    }

    /// The string must have at most `max` characters (Unicode scalar values).
    pub fn max(mut self, max: usize, message: impl Into<String>) -> Self {
        self.constraints.push(StringConstraint::MaxLength {
            max,
            message: message.into(),
        });
        self
    }

    /// The string must look like `local@domain.tld`.
    ///
    /// ```rust
    /// use fieldwork::{FieldPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let email = Schema::string().email("auth.validation.email");
    /// assert!(email.validate(&json!("ada@example.com"), &FieldPath::root()).is_success());
    /// assert!(email.validate(&json!("a@"), &FieldPath::root()).is_failure());
    /// ```
    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.constraints.push(StringConstraint::Email {
            message: message.into(),
        });
        self
    }

    /// The string must match `pattern`. Returns an error if the pattern is invalid.
    pub fn pattern(mut self, pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            message: message.into(),
        });
        Ok(self)
    }

    /// The string must equal one of `values`.
    pub fn one_of<I, V>(mut self, values: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.constraints.push(StringConstraint::OneOf {
            values: values.into_iter().map(Into::into).collect(),
            message: message.into(),
        });
        self
    }

    pub fn validate(&self, value: &Value, path: &FieldPath) -> Validation<String, Issues> {
        let s = match value {
            Value::Null => return self.missing(path),
            Value::String(s) if s.is_empty() => return self.missing(path),
            Value::String(s) => s,
            other => {
                let message = self
                    .type_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TYPE_MESSAGE.to_string());
                tracing::trace!(path = %path, got = value_type_name(other), "string type mismatch");
                return Validation::Failure(Issues::single(
                    Issue::new(path.clone(), message).with_kind(IssueKind::TypeMismatch),
                ));
            }
        };

        let issues: Vec<Issue> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, path))
            .collect();

        match Issues::from_vec(issues) {
            None => Validation::Success(s.clone()),
            Some(issues) => Validation::Failure(issues),
        }
    }

    fn missing(&self, path: &FieldPath) -> Validation<String, Issues> {
        let message = self
            .required_message
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string());
        Validation::Failure(Issues::single(
            Issue::new(path.clone(), message).with_kind(IssueKind::MissingRequired),
        ))
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<String, Issues> {
        StringSchema::validate(self, value, path)
    }
}

fn check_constraint(constraint: &StringConstraint, value: &str, path: &FieldPath) -> Option<Issue> {
    let failed = match constraint {
        StringConstraint::MinLength { min, message } => {
            (value.chars().count() < *min).then_some(message)
        }
        StringConstraint::MaxLength { max, message } => {
            (value.chars().count() > *max).then_some(message)
        }
        StringConstraint::Email { message } => (!EMAIL.is_match(value)).then_some(message),
        StringConstraint::Pattern { regex, message } => (!regex.is_match(value)).then_some(message),
        StringConstraint::OneOf { values, message } => {
            (!values.iter().any(|v| v == value)).then_some(message)
        }
    };
    failed.map(|message| {
        Issue::new(path.clone(), message.clone()).with_kind(IssueKind::ConstraintViolation)
    })
}
