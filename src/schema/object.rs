//! Object schema validation.
//!
//! This module provides [`ObjectSchema`], the shape of a whole form: a fixed,
//! ordered set of named field schemas plus a policy for keys the shape does
//! not mention.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueKind, Issues};
use crate::path::FieldPath;

use super::traits::{value_type_name, SchemaLike, ValueValidator};

const DEFAULT_TYPE_MESSAGE: &str = "expected object";

/// Definition of a field within an object schema.
#[derive(Clone)]
struct FieldDef {
    schema: Arc<dyn ValueValidator>,
    default: Option<Value>,
}

/// How to handle input keys the shape does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Drop them from the output (default).
    #[default]
    Strip,
    /// Copy them into the output unvalidated.
    Passthrough,
    /// Report each one as an issue.
    Reject,
}

/// A schema for validating a form's field values.
///
/// Every declared field is validated independently and every issue is
/// collected, so one submit surfaces all invalid fields at once. Issues are
/// reported in field declaration order; each issue path starts with the
/// field name. A missing key is validated as `null`, so each field schema
/// decides for itself what absence means.
///
/// The field set is fixed once the builder chain ends: there is no API to
/// add or remove fields on a schema that is already in use.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Schema};
/// use serde_json::json;
///
/// let login = Schema::object()
///     .field("email", Schema::string()
///         .required("auth.validation.required")
///         .email("auth.validation.email"))
///     .field("password", Schema::string()
///         .required("auth.validation.required")
///         .min(8, "auth.validation.passwordLength"))
///     .optional("rememberMe", Schema::boolean());
///
/// let result = login.validate(&json!({"email": "a@", "password": "abc"}), &FieldPath::root());
/// let issues = result.into_result().unwrap_err();
/// assert_eq!(issues.len(), 2);
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    unknown_keys: UnknownKeys,
    type_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            unknown_keys: UnknownKeys::default(),
            type_message: None,
        }
    }

    /// Adds a field validated by `schema`.
    ///
    /// Declaring the same name twice keeps the first position and the last schema.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Arc::new(schema),
                default: None,
            },
        );
        self
    }

    /// Adds a field that may be absent; shorthand for `field(name, schema.optional())`.
    pub fn optional<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.field(name, schema.optional())
    }

    /// Adds a field that takes `default` when the key is absent or `null`.
    ///
    /// ```rust
    /// use fieldwork::{FieldPath, Schema};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .default("plan", Schema::string().one_of(["free", "pro"], "plan"), json!("free"));
    ///
    /// let data = schema.validate(&json!({}), &FieldPath::root()).into_result().unwrap();
    /// assert_eq!(data.get("plan"), Some(&json!("free")));
    /// ```
    pub fn default<S>(mut self, name: impl Into<String>, schema: S, default: Value) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Arc::new(schema),
                default: Some(default),
            },
        );
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Sets the message reported when the input is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Returns the declared field names, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Validates one declared field in isolation, as if it sat at the top of a form.
    ///
    /// Returns `None` if the shape has no such field.
    pub fn validate_field(&self, name: &str, value: &Value) -> Option<Validation<Value, Issues>> {
        let def = self.fields.get(name)?;
        Some(validate_one(def, value, &FieldPath::from_field(name)))
    }

    pub fn validate(&self, value: &Value, path: &FieldPath) -> Validation<Map<String, Value>, Issues> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                let message = self
                    .type_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TYPE_MESSAGE.to_string());
                tracing::trace!(path = %path, got = value_type_name(value), "object type mismatch");
                return Validation::Failure(Issues::single(
                    Issue::new(path.clone(), message).with_kind(IssueKind::TypeMismatch),
                ));
            }
        };

        let mut issues = Vec::new();
        let mut validated = Map::new();

        for (name, def) in &self.fields {
            let field_value = obj.get(name).unwrap_or(&Value::Null);
            match validate_one(def, field_value, &path.push_field(name)) {
                Validation::Success(v) => {
                    validated.insert(name.clone(), v);
                }
                Validation::Failure(e) => issues.extend(e),
            }
        }

        for (key, value) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            match self.unknown_keys {
                UnknownKeys::Strip => {}
                UnknownKeys::Passthrough => {
                    validated.insert(key.clone(), value.clone());
                }
                UnknownKeys::Reject => issues.push(
                    Issue::new(path.push_field(key), format!("unknown field '{}'", key))
                        .with_kind(IssueKind::ConstraintViolation),
                ),
            }
        }

        match Issues::from_vec(issues) {
            None => Validation::Success(validated),
            Some(issues) => Validation::Failure(issues),
        }
    }
}

fn validate_one(def: &FieldDef, value: &Value, path: &FieldPath) -> Validation<Value, Issues> {
    match (&def.default, value) {
        (Some(default), Value::Null) => Validation::Success(default.clone()),
        _ => def.schema.validate_value(value, path),
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<Self::Output, Issues> {
        ObjectSchema::validate(self, value, path)
    }
}
