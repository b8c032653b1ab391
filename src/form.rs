//! Form binding: a schema plus a typed output.
//!
//! [`Form`] is the one place raw, untyped form state crosses into typed
//! domain values. [`Form::parse`] is the fallible primitive; everything above
//! it goes through [`Form::safe_parse`], which never fails and turns every
//! problem into issues.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueKind, Issues};
use crate::path::FieldPath;
use crate::schema::{ObjectSchema, SchemaLike, ValueValidator};
use crate::ValidationResult;

const DEFAULT_DECODE_MESSAGE: &str = "form.invalid";

/// Options for [`create_form`].
#[derive(Debug, Clone)]
pub struct FormOptions {
    name: String,
    decode_message: String,
}

impl FormOptions {
    pub fn new() -> Self {
        Self {
            name: "form".to_string(),
            decode_message: DEFAULT_DECODE_MESSAGE.to_string(),
        }
    }

    /// Names the form in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the form-level message used when a validated value does not fit
    /// the output type.
    pub fn with_decode_message(mut self, message: impl Into<String>) -> Self {
        self.decode_message = message.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A schema bound to a typed output.
///
/// `T` is decoded with serde from the schema's validated output, so the
/// output type's field names follow the form's (use `#[serde(rename_all =
/// "camelCase")]` for camel-cased forms).
///
/// # Example
///
/// ```rust
/// use fieldwork::{create_form, FormOptions, Schema};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// #[serde(rename_all = "camelCase")]
/// struct Login {
///     email: String,
///     password: String,
///     remember_me: Option<bool>,
/// }
///
/// let form = create_form::<Login>(
///     Schema::object()
///         .field("email", Schema::string().required("required").email("email"))
///         .field("password", Schema::string().required("required").min(8, "length"))
///         .optional("rememberMe", Schema::boolean()),
///     FormOptions::default(),
/// );
///
/// let result = form.safe_parse(&json!({"email": "ada@example.com", "password": "hunter22"}));
/// assert_eq!(result.into_result().unwrap().remember_me, None);
/// ```
pub struct Form<T> {
    schema: Arc<dyn ValueValidator>,
    shape: Option<ObjectSchema>,
    options: FormOptions,
    _output: PhantomData<fn() -> T>,
}

/// Binds an object schema to the output type `T`.
pub fn create_form<T: DeserializeOwned>(schema: ObjectSchema, options: FormOptions) -> Form<T> {
    Form {
        schema: Arc::new(schema.clone()),
        shape: Some(schema),
        options,
        _output: PhantomData,
    }
}

impl<T: DeserializeOwned> Form<T> {
    /// Binds any schema to `T`. Per-field validation is only available for
    /// forms created from an object schema.
    pub fn from_schema<S>(schema: S, options: FormOptions) -> Self
    where
        S: SchemaLike + 'static,
    {
        Self {
            schema: Arc::new(schema),
            shape: None,
            options,
            _output: PhantomData,
        }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Validates and decodes `raw`, returning the issues as an error.
    ///
    /// Prefer [`safe_parse`](Self::safe_parse) at call sites that render errors.
    pub fn parse(&self, raw: &Value) -> Result<T, Issues> {
        let validated = self.schema.validate_value(raw, &FieldPath::root()).into_result()?;
        serde_json::from_value(validated).map_err(|err| {
            tracing::debug!(form = %self.options.name, error = %err, "validated value did not decode");
            Issues::single(
                Issue::new(FieldPath::root(), self.options.decode_message.clone())
                    .with_kind(IssueKind::TypeMismatch),
            )
        })
    }

    /// Validates and decodes `raw` without failing.
    ///
    /// The result depends only on the schema and `raw`: identical input gives
    /// identical issues in identical order.
    pub fn safe_parse(&self, raw: &Value) -> ValidationResult<T> {
        match self.parse(raw) {
            Ok(data) => Validation::Success(data),
            Err(issues) => {
                tracing::debug!(form = %self.options.name, issues = issues.len(), "form rejected");
                Validation::Failure(issues)
            }
        }
    }

    /// Validates a single field of the form, for live feedback while typing.
    ///
    /// Returns `None` when the form has no object shape or no such field.
    pub fn validate_field(&self, name: &str, value: &Value) -> Option<Result<(), Issues>> {
        let shape = self.shape.as_ref()?;
        shape
            .validate_field(name, value)
            .map(|result| result.into_result().map(|_| ()))
    }
}

impl<T> Clone for Form<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            shape: self.shape.clone(),
            options: self.options.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Form<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
