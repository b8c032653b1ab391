//! The per-field error map.

use std::fmt;

use indexmap::IndexMap;
use stillwater::prelude::*;

/// The key that holds errors not attributable to a single field.
pub const FORM_KEY: &str = "form";

/// Ordered error messages per field.
///
/// Field keys keep first-insertion order and each field's messages keep
/// insertion order; duplicates are kept. A key is present only while it has
/// at least one message, so `get` returning an empty slice means "no error".
///
/// `FieldErrorMap` is a `Semigroup`: `a.combine(b)` concatenates `b`'s
/// messages after `a`'s for every key. This is associative, which is what
/// makes [`merge`](super::merge) order-stable.
///
/// # Example
///
/// ```rust
/// use fieldwork::FieldErrorMap;
/// use stillwater::prelude::*;
///
/// let client: FieldErrorMap = [("email", "E1")].into_iter().collect();
/// let server: FieldErrorMap = [("email", "E2")].into_iter().collect();
///
/// let merged = client.combine(server);
/// assert_eq!(merged.get("email"), ["E1", "E2"]);
/// assert_eq!(merged.first("email"), Some("E1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorMap {
    fields: IndexMap<String, Vec<String>>,
}

impl FieldErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message to `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Appends several messages to `field`; an empty iterator leaves the map unchanged.
    pub fn extend_field<I, M>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        let mut messages = messages.into_iter().map(Into::into).peekable();
        if messages.peek().is_none() {
            return;
        }
        self.fields.entry(field.into()).or_default().extend(messages);
    }

    /// Returns the messages for `field`, empty when the field has none.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the message shown inline for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Returns the whole-form messages, shown as a banner.
    pub fn form_messages(&self) -> &[String] {
        self.get(FORM_KEY)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn message_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Applies `f` to every message, keeping keys and order.
    pub fn map_messages<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().map(|m| f(m)).collect()))
            .collect();
        Self { fields }
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.fields
    }
}

impl Semigroup for FieldErrorMap {
    fn combine(mut self, other: Self) -> Self {
        for (field, messages) in other.fields {
            self.extend_field(field, messages);
        }
        self
    }
}

impl<K, M> FromIterator<(K, M)> for FieldErrorMap
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (field, message) in iter {
            map.push(field, message);
        }
        map
    }
}

impl fmt::Display for FieldErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, messages) in &self.fields {
            writeln!(f, "{}: {}", field, messages.join("; "))?;
        }
        Ok(())
    }
}
