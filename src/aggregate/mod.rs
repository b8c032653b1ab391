//! Error aggregation: every error source folded into one [`FieldErrorMap`].
//!
//! Three sources feed the map: schema issues from a failed parse, a
//! ready-made per-field mapping on a server error, and the `{code, params}`
//! envelope some endpoints return. Each conversion is total (bad or missing
//! input gives an empty map) and [`merge`] concatenates results in order.
//!
//! # Example
//!
//! ```rust
//! use fieldwork::aggregate::{from_schema_issues, from_server, merge};
//! use fieldwork::{FieldPath, Issue, Issues, ServerError, ServerErrorOptions};
//!
//! let issues = Issues::single(Issue::new(FieldPath::from_field("email"), "E1"));
//! let server = ServerError::new("http_422").with_field_error("email", "E2");
//!
//! let merged = merge([
//!     from_schema_issues(&issues),
//!     from_server(Some(&server), &ServerErrorOptions::default()),
//! ]);
//! assert_eq!(merged.get("email"), ["E1", "E2"]);
//! ```

mod map;
mod server;

pub use map::{FieldErrorMap, FORM_KEY};
pub use server::{Messages, ServerError, ServerErrorOptions, ServerErrorParams, ServerFieldError};

use stillwater::prelude::*;

use crate::error::Issue;

/// Files each issue under its top-level field, or under [`FORM_KEY`] when the
/// issue path is empty. Issue order is preserved.
pub fn from_schema_issues<'a, I>(issues: I) -> FieldErrorMap
where
    I: IntoIterator<Item = &'a Issue>,
{
    issues
        .into_iter()
        .map(|issue| {
            let key = issue.path.head_key().unwrap_or_else(|| FORM_KEY.to_string());
            (key, issue.message.clone())
        })
        .collect()
}

/// Reads the ready-made per-field mapping off a server error, keys verbatim.
///
/// `None`, or an error without the mapping, gives an empty map.
pub fn from_server_error(error: Option<&ServerError>) -> FieldErrorMap {
    let Some(fields) = error.and_then(|e| e.field_errors.as_ref()) else {
        return FieldErrorMap::new();
    };

    let mut map = FieldErrorMap::new();
    for (field, messages) in fields {
        map.extend_field(field.clone(), messages.to_vec());
    }
    map
}

/// Reads the `{code, params}` envelope of a server error.
///
/// For the validation code, each `params.errors` entry with a field becomes a
/// message under the normalized field key; the message is the configured one
/// for the entry's type, or the server's text. Entries with neither are
/// skipped. For the missing-fields code,
/// each listed field gets the configured required message. Other codes give
/// an empty map.
pub fn from_api_error(error: Option<&ServerError>, options: &ServerErrorOptions) -> FieldErrorMap {
    let mut map = FieldErrorMap::new();
    let Some(error) = error else {
        return map;
    };
    let Some(params) = error.params.as_ref() else {
        return map;
    };

    if error.code == options.validation_code() {
        for entry in &params.errors {
            let Some(raw) = entry.field.as_deref() else {
                continue;
            };
            let field = options.normalize_field(raw);
            if field.is_empty() {
                continue;
            }
            let message = entry
                .kind
                .as_deref()
                .and_then(|kind| options.message_for_type(kind))
                .unwrap_or(entry.message.as_str());
            if message.is_empty() {
                continue;
            }
            map.push(field, message);
        }
    }

    if error.code == options.missing_fields_code() {
        for field in &params.missing_fields {
            map.push(field.clone(), options.missing_field_message());
        }
    }

    tracing::debug!(code = %error.code, fields = map.len(), "mapped server error");
    map
}

/// Everything a server error says about fields: the ready-made mapping
/// followed by the envelope entries.
pub fn from_server(error: Option<&ServerError>, options: &ServerErrorOptions) -> FieldErrorMap {
    merge([from_server_error(error), from_api_error(error, options)])
}

/// Concatenates maps left to right: for each key, the messages of every
/// input in input order. Nothing is deduplicated, reordered or dropped.
pub fn merge<I>(maps: I) -> FieldErrorMap
where
    I: IntoIterator<Item = FieldErrorMap>,
{
    maps.into_iter()
        .fold(FieldErrorMap::new(), |merged, map| merged.combine(map))
}
