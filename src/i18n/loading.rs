//! Loading translation tables from a directory of `<locale>.json` files.
//!
//! Filesystem access goes through the [`FileSystem`] trait so tests can swap
//! in an in-memory tree. Every file is attempted; failures are collected and
//! reported together while the good files still load.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::translator::Translator;

/// Supplies the filesystem used to load translations.
pub trait TranslationEnv: Send + Sync {
    type Fs: FileSystem;

    fn filesystem(&self) -> &Self::Fs;
}

/// Minimal read-only filesystem access.
pub trait FileSystem: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error>;

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error>;
}

/// The process filesystem, via `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    type Error = std::io::Error;

    fn read_file(&self, path: &Path) -> Result<String, Self::Error> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Self::Error> {
        let mut entries = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        Ok(entries)
    }
}

impl TranslationEnv for OsFileSystem {
    type Fs = Self;

    fn filesystem(&self) -> &Self::Fs {
        self
    }
}

/// Errors raised while loading translation files.
#[derive(Debug, thiserror::Error)]
pub enum TranslationLoadError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, Box<dyn std::error::Error + Send + Sync>),

    #[error("Parse error in {0}: {1}")]
    Parse(PathBuf, serde_json::Error),

    /// The document for a locale was not a JSON object.
    #[error("Translations for {0} must be a JSON object")]
    NotAnObject(String),

    #[error("Invalid filename: {0}")]
    InvalidFileName(PathBuf),

    #[error("Multiple errors: {0:?}")]
    Multiple(Vec<TranslationLoadError>),
}

impl Translator {
    /// Loads every `*.json` file in `path` from the process filesystem.
    ///
    /// See [`load_dir_with_env`](Self::load_dir_with_env).
    pub fn load_dir(&self, path: impl AsRef<Path>) -> Result<usize, TranslationLoadError> {
        self.load_dir_with_env(path, &OsFileSystem)
    }

    /// Loads every `*.json` file in `path`, naming each table after the file
    /// stem (`pt-BR.json` → `pt-BR`). Entries merge into existing tables.
    ///
    /// Returns the number of locales loaded. If any file fails, the rest are
    /// still loaded and the failures come back as
    /// [`TranslationLoadError::Multiple`].
    pub fn load_dir_with_env<E: TranslationEnv>(
        &self,
        path: impl AsRef<Path>,
        env: &E,
    ) -> Result<usize, TranslationLoadError> {
        let path = path.as_ref();
        let fs = env.filesystem();
        let files = fs
            .read_dir(path)
            .map_err(|e| TranslationLoadError::Io(path.to_path_buf(), Box::new(e)))?;

        let mut loaded = 0;
        let mut errors = Vec::new();

        for file in files {
            if file.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match self.load_locale_file(&file, fs) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "skipping translation file");
                    errors.push(e);
                }
            }
        }

        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(TranslationLoadError::Multiple(errors))
        }
    }

    fn load_locale_file<Fs: FileSystem>(&self, path: &Path, fs: &Fs) -> Result<(), TranslationLoadError> {
        let locale = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TranslationLoadError::InvalidFileName(path.to_path_buf()))?;

        let content = fs
            .read_file(path)
            .map_err(|e| TranslationLoadError::Io(path.to_path_buf(), Box::new(e)))?;

        let json: Value =
            serde_json::from_str(&content).map_err(|e| TranslationLoadError::Parse(path.to_path_buf(), e))?;

        self.load_json(locale, &json, true)?;
        Ok(())
    }
}
