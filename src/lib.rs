//! # Fieldwork
//!
//! Form validation that reports every problem at once, merges in what the
//! server says, and hands the presentation layer a translated, observable
//! map of messages per field.
//!
//! ## Overview
//!
//! A submit runs through one pipeline:
//!
//! 1. A [`Form`] validates raw input against a [`Schema`], collecting every
//!    [`Issue`] instead of stopping at the first (stillwater's `Validation`
//!    does the accumulation).
//! 2. The [`aggregate`] functions turn issues, and any [`ServerError`], into a
//!    [`FieldErrorMap`] and concatenate them in order.
//! 3. A [`Translator`] resolves each message key for the current locale.
//! 4. The result is published on a [`ValueChannel`] that views subscribe to.
//!
//! [`FormSession`] wires the four steps together.
//!
//! ## Example
//!
//! ```rust
//! use fieldwork::{create_form, aggregate, FormOptions, Schema};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Register {
//!     full_name: String,
//!     email: String,
//!     password: String,
//!     accept_terms: bool,
//! }
//!
//! let form = create_form::<Register>(
//!     Schema::object()
//!         .field("fullName", Schema::string().required("auth.validation.fullName"))
//!         .field("email", Schema::string()
//!             .required("auth.validation.required")
//!             .email("auth.validation.email"))
//!         .field("password", Schema::string()
//!             .required("auth.validation.required")
//!             .min(8, "auth.validation.passwordLength"))
//!         .field("acceptTerms", Schema::boolean().must_be_true("auth.validation.acceptTerms")),
//!     FormOptions::default().with_name("register"),
//! );
//!
//! let issues = form
//!     .safe_parse(&json!({"fullName": "", "email": "a@", "password": "abc", "acceptTerms": false}))
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(issues.len(), 4);
//!
//! let errors = aggregate::from_schema_issues(&issues);
//! assert_eq!(
//!     errors.keys().collect::<Vec<_>>(),
//!     vec!["fullName", "email", "password", "acceptTerms"]
//! );
//! ```

pub mod aggregate;
pub mod error;
pub mod form;
pub mod i18n;
pub mod path;
pub mod reactive;
pub mod schema;
pub mod session;

pub use aggregate::{FieldErrorMap, Messages, ServerError, ServerErrorOptions, ServerFieldError, FORM_KEY};
pub use error::{Issue, IssueKind, Issues};
pub use form::{create_form, Form, FormOptions};
pub use i18n::{TranslationLoadError, Translator, TranslatorConfig};
pub use path::{FieldPath, PathSegment};
pub use reactive::{CellOptions, ReactiveCell, ReadOnlyChannel, Subscription, ValueChannel};
pub use schema::{
    BooleanSchema, ObjectSchema, Optional, Refined, Schema, SchemaLike, StringSchema, UnknownKeys,
    ValueValidator,
};
pub use session::FormSession;

/// Type alias for validation results using Issues
pub type ValidationResult<T> = stillwater::Validation<T, Issues>;
