//! Schema definitions for validation.
//!
//! Each schema type validates a raw `serde_json::Value` and accumulates all
//! issues rather than stopping at the first. Schemas are immutable values
//! built with consuming builders, so a schema can be cloned and extended
//! without affecting the original.
//!
//! # Example
//!
//! ```rust
//! use fieldwork::{FieldPath, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::string().min(1, "required").max(100, "too long");
//!
//! let result = schema.validate(&json!("hello"), &FieldPath::root());
//! assert!(result.is_success());
//! ```

mod boolean;
mod combinators;
mod object;
mod string;
mod traits;

pub use boolean::BooleanSchema;
pub use combinators::{Optional, Refined};
pub use object::{ObjectSchema, UnknownKeys};
pub use string::StringSchema;
pub use traits::{SchemaLike, ValueValidator};

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use fieldwork::{FieldPath, Schema};
/// use serde_json::json;
///
/// let register = Schema::object()
///     .field("fullName", Schema::string().required("auth.validation.fullName"))
///     .field("email", Schema::string()
///         .required("auth.validation.required")
///         .email("auth.validation.email"))
///     .field("acceptTerms", Schema::boolean().must_be_true("auth.validation.acceptTerms"));
///
/// let result = register.validate(&json!({
///     "fullName": "Ada Lovelace",
///     "email": "ada@example.com",
///     "acceptTerms": true
/// }), &FieldPath::root());
/// assert!(result.is_success());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a string schema. Absent values (`null` or `""`) fail with the
    /// message set by [`StringSchema::required`].
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a boolean schema. Absent values read as `false`.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates an object schema with no fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }
}
