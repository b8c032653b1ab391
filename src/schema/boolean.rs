//! Boolean schema validation.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueKind, Issues};
use crate::path::FieldPath;

use super::traits::{value_type_name, SchemaLike};

const DEFAULT_TYPE_MESSAGE: &str = "expected boolean";

/// A schema for checkbox-style values.
///
/// An absent value is read as `false`, which is what an untouched checkbox
/// means. Wrap the schema in [`optional`](SchemaLike::optional) to keep
/// absence distinct instead.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Schema};
/// use serde_json::json;
///
/// let terms = Schema::boolean().must_be_true("auth.validation.acceptTerms");
///
/// assert!(terms.validate(&json!(true), &FieldPath::root()).is_success());
/// assert!(terms.validate(&json!(false), &FieldPath::root()).is_failure());
/// assert!(terms.validate(&json!(null), &FieldPath::root()).is_failure());
/// ```
#[derive(Clone, Default)]
pub struct BooleanSchema {
    must_be_true: Option<String>,
    type_message: Option<String>,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only a literal `true` passes; anything else reports `message`.
    pub fn must_be_true(mut self, message: impl Into<String>) -> Self {
        self.must_be_true = Some(message.into());
        self
    }

    /// Sets the message reported when the value is not a boolean.
    pub fn type_error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    pub fn validate(&self, value: &Value, path: &FieldPath) -> Validation<bool, Issues> {
        let flag = match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            other => {
                let message = self
                    .type_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TYPE_MESSAGE.to_string());
                tracing::trace!(path = %path, got = value_type_name(other), "boolean type mismatch");
                return Validation::Failure(Issues::single(
                    Issue::new(path.clone(), message).with_kind(IssueKind::TypeMismatch),
                ));
            }
        };

        match &self.must_be_true {
            Some(message) if !flag => Validation::Failure(Issues::single(
                Issue::new(path.clone(), message.clone()).with_kind(IssueKind::ConstraintViolation),
            )),
            _ => Validation::Success(flag),
        }
    }
}

impl SchemaLike for BooleanSchema {
    type Output = bool;

    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<bool, Issues> {
        BooleanSchema::validate(self, value, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_reads_as_false() {
        let result = BooleanSchema::new().validate(&json!(null), &FieldPath::root());
        assert!(!result.into_result().unwrap());
    }

    #[test]
    fn test_rejects_non_boolean() {
        let schema = BooleanSchema::new();
        for input in [json!("true"), json!(1), json!([])] {
            let errors = schema.validate(&input, &FieldPath::root()).into_result().unwrap_err();
            assert_eq!(errors.first().kind, IssueKind::TypeMismatch);
            assert_eq!(errors.first().message, DEFAULT_TYPE_MESSAGE);
        }
    }

    #[test]
    fn test_must_be_true() {
        let schema = BooleanSchema::new().must_be_true("terms");
        let path = FieldPath::from_field("acceptTerms");

        assert!(schema.validate(&json!(true), &path).is_success());
        for input in [json!(false), json!(null)] {
            let errors = schema.validate(&input, &path).into_result().unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.first().message, "terms");
            assert_eq!(errors.first().path, path);
        }
    }

    #[test]
    fn test_type_mismatch_wins_over_must_be_true() {
        let schema = BooleanSchema::new().must_be_true("terms").type_error("checkbox");
        let errors = schema.validate(&json!("yes"), &FieldPath::root()).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().message, "checkbox");
    }
}
