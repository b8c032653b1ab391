//! Server-reported error payloads and how they map onto fields.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One message or a list of messages for a field, as servers send either.
///
/// Deserialization never fails: numbers and booleans are stringified, list
/// entries that are not scalars are skipped, and anything else reads as an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Messages::One(message) => vec![message],
            Messages::Many(messages) => messages,
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.clone().into_vec()
    }
}

impl<'de> Deserialize<'de> for Messages {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let messages = match Value::deserialize(deserializer)? {
            Value::Array(items) => Messages::Many(items.iter().filter_map(scalar_text).collect()),
            other => match scalar_text(&other) {
                Some(message) => Messages::One(message),
                None => Messages::Many(Vec::new()),
            },
        };
        Ok(messages)
    }
}

impl From<&str> for Messages {
    fn from(message: &str) -> Self {
        Messages::One(message.to_string())
    }
}

impl From<Vec<String>> for Messages {
    fn from(messages: Vec<String>) -> Self {
        Messages::Many(messages)
    }
}

/// A single field failure reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerFieldError {
    #[serde(default, deserialize_with = "text")]
    pub code: String,
    /// Raw location, possibly prefixed (e.g. `body.email`).
    #[serde(default, deserialize_with = "optional_text")]
    pub field: Option<String>,
    /// Machine-readable failure type (e.g. `invalid_email`).
    #[serde(default, rename = "type", deserialize_with = "optional_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub message: String,
}

/// Structured details attached to a server error.
///
/// Malformed entries are dropped one by one; the rest still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerErrorParams {
    #[serde(default, deserialize_with = "lenient_list")]
    pub errors: Vec<ServerFieldError>,
    #[serde(default, deserialize_with = "text_list")]
    pub missing_fields: Vec<String>,
}

/// An application error returned by a remote call.
///
/// Two shapes are understood: a ready-made per-field mapping
/// (`fieldErrors`, also accepted as `details`) and the `{code, params}`
/// envelope carrying a list of [`ServerFieldError`]s.
///
/// ```rust
/// use fieldwork::ServerError;
///
/// let error: ServerError = serde_json::from_str(r#"{
///     "code": "VALIDATION_ERROR",
///     "params": {"errors": [{"field": "body.email", "type": "invalid_email", "message": "bad"}]}
/// }"#).unwrap();
///
/// assert_eq!(error.params.unwrap().errors[0].field.as_deref(), Some("body.email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    #[serde(default, deserialize_with = "text")]
    pub code: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub message: Option<String>,
    #[serde(default, rename = "fieldErrors", alias = "details", deserialize_with = "lenient")]
    pub field_errors: Option<IndexMap<String, Messages>>,
    #[serde(default, deserialize_with = "lenient")]
    pub params: Option<ServerErrorParams>,
}

impl ServerError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Adds a ready-made message (or messages) for `field`.
    pub fn with_field_error(mut self, field: impl Into<String>, messages: impl Into<Messages>) -> Self {
        self.field_errors
            .get_or_insert_with(IndexMap::new)
            .insert(field.into(), messages.into());
        self
    }

    /// Adds a `params.errors` entry.
    pub fn with_param_error(mut self, error: ServerFieldError) -> Self {
        self.params.get_or_insert_with(ServerErrorParams::default).errors.push(error);
        self
    }

    /// Adds a `params.missing_fields` entry.
    pub fn with_missing_field(mut self, field: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(ServerErrorParams::default)
            .missing_fields
            .push(field.into());
        self
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.iter().filter_map(scalar_text).collect()),
        _ => Ok(Vec::new()),
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed server error entry");
                None
            }
        })
        .collect())
}

// Null or a value of the wrong shape reads as the default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "ignoring malformed server error section");
        T::default()
    }))
}

/// How `{code, params}` server errors are turned into field messages.
///
/// ```rust
/// use fieldwork::ServerErrorOptions;
///
/// let options = ServerErrorOptions::default()
///     .with_type_message("string_too_short", "signup.tooShort");
/// assert_eq!(options.message_for_type("string_too_short"), Some("signup.tooShort"));
/// assert_eq!(options.field_prefix(), "body.");
/// ```
#[derive(Debug, Clone)]
pub struct ServerErrorOptions {
    validation_code: String,
    missing_fields_code: String,
    field_prefix: String,
    missing_field_message: String,
    type_messages: HashMap<String, String>,
}

impl ServerErrorOptions {
    pub fn new() -> Self {
        let type_messages = [
            ("missing", "auth.validation.required"),
            ("value_error", "auth.validation.invalidValue"),
            ("string_too_short", "auth.validation.tooShort"),
            ("string_too_long", "auth.validation.tooLong"),
            ("invalid_email", "auth.validation.email"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            validation_code: "VALIDATION_ERROR".to_string(),
            missing_fields_code: "DOC_MISSING_FIELDS".to_string(),
            field_prefix: "body.".to_string(),
            missing_field_message: "auth.validation.required".to_string(),
            type_messages,
        }
    }

    /// Sets the error code whose `params.errors` are read.
    pub fn with_validation_code(mut self, code: impl Into<String>) -> Self {
        self.validation_code = code.into();
        self
    }

    /// Sets the error code whose `params.missing_fields` are read.
    pub fn with_missing_fields_code(mut self, code: impl Into<String>) -> Self {
        self.missing_fields_code = code.into();
        self
    }

    /// Sets the prefix stripped (once, from the start) from server field locations.
    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.field_prefix = prefix.into();
        self
    }

    pub fn with_missing_field_message(mut self, message: impl Into<String>) -> Self {
        self.missing_field_message = message.into();
        self
    }

    /// Maps a server failure type to a message, overriding the server's own text.
    pub fn with_type_message(mut self, kind: impl Into<String>, message: impl Into<String>) -> Self {
        self.type_messages.insert(kind.into(), message.into());
        self
    }

    pub fn validation_code(&self) -> &str {
        &self.validation_code
    }

    pub fn missing_fields_code(&self) -> &str {
        &self.missing_fields_code
    }

    pub fn field_prefix(&self) -> &str {
        &self.field_prefix
    }

    pub fn missing_field_message(&self) -> &str {
        &self.missing_field_message
    }

    pub fn message_for_type(&self, kind: &str) -> Option<&str> {
        self.type_messages.get(kind).map(String::as_str)
    }

    /// Strips the configured prefix from a raw server location.
    ///
    /// Only one leading occurrence is removed; deeper segments stay as-is, so
    /// `body.address.zip` becomes `address.zip` and `query.body.x` is kept whole.
    pub fn normalize_field<'a>(&self, raw: &'a str) -> &'a str {
        if self.field_prefix.is_empty() {
            return raw;
        }
        raw.strip_prefix(self.field_prefix.as_str()).unwrap_or(raw)
    }
}

impl Default for ServerErrorOptions {
    fn default() -> Self {
        Self::new()
    }
}
