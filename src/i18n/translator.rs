//! The message translator context.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::aggregate::FieldErrorMap;

use super::loading::TranslationLoadError;

/// Key → localized string for one locale.
pub type TranslationTable = HashMap<String, String>;

/// Settings for a [`Translator`].
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    default_locale: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self {
            default_locale: "pt-BR".to_string(),
        }
    }

    /// Sets the locale a new translator starts in.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves message keys to localized strings for the current locale.
///
/// A translator is an explicit context object: whoever owns it owns the
/// current locale. It can be shared behind an `Arc`; locale switches and
/// table loads are visible to every holder once they return.
///
/// A missing key resolves to itself. Raw literal messages and translation
/// keys travel on the same channel, so a message that was never a key simply
/// comes back unchanged.
///
/// # Example
///
/// ```rust
/// use fieldwork::{Translator, TranslatorConfig};
///
/// let translator = Translator::new(TranslatorConfig::default().with_default_locale("en-US"));
/// translator.set_translation("en-US", [("auth.validation.email", "Enter a valid email")], false);
///
/// assert_eq!(translator.instant("auth.validation.email"), "Enter a valid email");
/// assert_eq!(translator.instant("Already readable"), "Already readable");
/// ```
#[derive(Debug)]
pub struct Translator {
    tables: RwLock<HashMap<String, TranslationTable>>,
    locale: RwLock<String>,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            locale: RwLock::new(config.default_locale),
        }
    }

    /// Switches the current locale. Last write wins.
    pub fn use_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        tracing::debug!(%locale, "switching locale");
        *self.locale.write() = locale;
    }

    pub fn current_locale(&self) -> String {
        self.locale.read().clone()
    }

    /// Returns the locales that have a table, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<_> = self.tables.read().keys().cloned().collect();
        locales.sort();
        locales
    }

    /// Installs entries for `locale`.
    ///
    /// With `merge` the entries overlay the existing table; without it they
    /// replace the table.
    pub fn set_translation<I, K, V>(&self, locale: impl Into<String>, entries: I, merge: bool)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into()));
        let mut tables = self.tables.write();
        let table = tables.entry(locale.into()).or_default();
        if !merge {
            table.clear();
        }
        table.extend(entries);
    }

    /// Flattens a nested JSON document and installs it for `locale`.
    ///
    /// ```rust
    /// use fieldwork::Translator;
    /// use serde_json::json;
    ///
    /// let translator = Translator::default();
    /// translator
    ///     .load_json("pt-BR", &json!({"auth": {"validation": {"email": "E-mail inválido"}}}), true)
    ///     .unwrap();
    /// assert_eq!(translator.instant("auth.validation.email"), "E-mail inválido");
    /// ```
    pub fn load_json(&self, locale: &str, document: &Value, merge: bool) -> Result<usize, TranslationLoadError> {
        let table = flatten_translations(document)
            .ok_or_else(|| TranslationLoadError::NotAnObject(locale.to_string()))?;
        let count = table.len();
        self.set_translation(locale, table, merge);
        tracing::debug!(%locale, entries = count, "loaded translations");
        Ok(count)
    }

    /// Looks up `key` in the current locale, falling back to the key itself.
    pub fn instant(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    /// Looks up `key` in the current locale, falling back to `fallback`.
    pub fn instant_or(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or_else(|| fallback.to_string())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Translates every message of `errors`, keeping fields, order and counts.
    pub fn translate_all(&self, errors: &FieldErrorMap) -> FieldErrorMap {
        let locale = self.locale.read().clone();
        let tables = self.tables.read();
        let table = tables.get(&locale);
        errors.map_messages(|message| resolve(table, message).unwrap_or_else(|| message.to_string()))
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let locale = self.locale.read();
        let tables = self.tables.read();
        let found = resolve(tables.get(locale.as_str()), key);
        if found.is_none() {
            tracing::trace!(locale = %*locale, key, "translation miss");
        }
        found
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(TranslatorConfig::default())
    }
}

// An empty translation counts as a miss so a lookup never yields "".
fn resolve(table: Option<&TranslationTable>, key: &str) -> Option<String> {
    table
        .and_then(|t| t.get(key))
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Flattens nested JSON objects into dotted keys.
///
/// `{"auth": {"validation": {"email": "x"}}}` becomes `auth.validation.email → x`.
/// Non-string leaves are skipped. Returns `None` if `document` is not an object.
pub fn flatten_translations(document: &Value) -> Option<TranslationTable> {
    let root = document.as_object()?;
    let mut table = TranslationTable::new();
    let mut stack: Vec<(String, &Value)> = root.iter().rev().map(|(k, v)| (k.clone(), v)).collect();

    while let Some((key, value)) = stack.pop() {
        match value {
            Value::String(text) => {
                table.insert(key, text.clone());
            }
            Value::Object(children) => {
                stack.extend(
                    children
                        .iter()
                        .rev()
                        .map(|(child, v)| (format!("{}.{}", key, child), v)),
                );
            }
            _ => {}
        }
    }

    Some(table)
}
