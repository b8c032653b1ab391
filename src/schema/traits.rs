//! Traits for schema polymorphism.
//!
//! [`SchemaLike`] lets string, boolean and object schemas nest inside each
//! other, and provides the [`optional`](SchemaLike::optional) and
//! [`refine`](SchemaLike::refine) wrappers that every schema supports.

use serde_json::Value;
use stillwater::Validation;

use crate::error::Issues;
use crate::path::FieldPath;

use super::combinators::{Optional, Refined};

/// A schema that validates a raw JSON value.
///
/// The `Send + Sync` bounds allow a schema built once at startup to be shared
/// across forms and threads behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let nickname = Schema::string()
///     .min(3, "auth.validation.nicknameLength")
///     .optional();
///
/// assert!(nickname.validate(&json!(null), &FieldPath::root()).is_success());
/// assert!(nickname.validate(&json!("al"), &FieldPath::root()).is_failure());
/// ```
pub trait SchemaLike: Send + Sync {
    /// The typed value produced by successful validation.
    type Output: Into<Value>;

    /// Validates `value`, reporting every issue found under `path`.
    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<Self::Output, Issues>;

    /// Validates `value` and converts the typed output back into a JSON value.
    ///
    /// Object schemas use this to store heterogeneous field outputs together.
    fn validate_to_value(&self, value: &Value, path: &FieldPath) -> Validation<Value, Issues> {
        self.validate(value, path).map(Into::into)
    }

    /// Wraps this schema so an absent (`null` or missing) value is accepted.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Adds a custom predicate, checked only after this schema succeeds.
    ///
    /// ```rust
    /// use fieldwork::{FieldPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let username = Schema::string()
    ///     .required("auth.validation.required")
    ///     .refine(|s: &String| !s.contains(' '), "auth.validation.noSpaces");
    ///
    /// let result = username.validate(&json!("ada lovelace"), &FieldPath::root());
    /// assert!(result.is_failure());
    /// ```
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refined<Self>
    where
        Self: Sized,
        F: Fn(&Self::Output) -> bool + Send + Sync + 'static,
    {
        Refined::new(self, predicate, message)
    }
}

/// A type-erased schema that validates to a JSON value.
///
/// Object schemas hold their field schemas as `Arc<dyn ValueValidator>`, and
/// forms hold their root schema the same way.
pub trait ValueValidator: Send + Sync {
    fn validate_value(&self, value: &Value, path: &FieldPath) -> Validation<Value, Issues>;
}

impl<S: SchemaLike> ValueValidator for S {
    fn validate_value(&self, value: &Value, path: &FieldPath) -> Validation<Value, Issues> {
        self.validate_to_value(value, path)
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
