//! Message translation.
//!
//! Validation and server errors carry message keys such as
//! `auth.validation.email`. A [`Translator`] turns them into text for the
//! current locale just before display; keys it does not know pass through
//! untouched.

mod loading;
mod translator;

pub use loading::{FileSystem, OsFileSystem, TranslationEnv, TranslationLoadError};
pub use translator::{flatten_translations, TranslationTable, Translator, TranslatorConfig};
