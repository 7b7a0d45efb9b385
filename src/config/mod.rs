//! Configuration state loaded from a flat `KEY=VALUE` env file.
//!
//! Values are taken literally from the file, then the process environment
//! overrides the keys the application knows about.

mod duration;
mod env_file;
mod error;
mod settings;
mod source;

pub(crate) use duration::parse_duration;
pub use error::ConfigError;
pub use settings::AppSettings;
pub use source::{EnvSource, ProcessEnv};

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Env file read when `ENVCHECK_FILE` is not set.
pub const DEFAULT_ENV_PATH: &str = ".env";

/// Environment variable that overrides the env file location.
pub const ENV_FILE_VAR: &str = "ENVCHECK_FILE";

/// Outcome of reading the env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFileStatus {
    /// The file was read; `entries` assignments were accepted.
    Loaded { entries: usize },
    /// No file exists at the path.
    NotFound,
    /// The file exists but could not be read.
    Unreadable(String),
}

/// Mapping of configuration keys to their values for this process.
///
/// Built once at start-up and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigState {
    values: HashMap<String, String>,
}

impl ConfigState {
    /// Load key/value pairs from the env file at `path`.
    ///
    /// Blank lines and `#` comments are skipped; keys and values are trimmed
    /// and otherwise kept as written. A malformed line is logged and skipped;
    /// a later assignment of the same key replaces an earlier one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut values = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            match env_file::parse_line(line) {
                Ok(Some((key, value))) => {
                    values.insert(key, value);
                }
                Ok(None) => {}
                Err(reason) => {
                    warn!(
                        path = %path.display(),
                        line = index + 1,
                        reason = %reason,
                        "Skipping malformed env file line"
                    );
                }
            }
        }

        debug!(path = %path.display(), entries = values.len(), "Env file loaded");
        Ok(Self { values })
    }

    /// Like [`ConfigState::load`], but an absent or unreadable file yields an
    /// empty state so that every key is treated as unset.
    pub fn load_or_empty(path: impl AsRef<Path>) -> (Self, EnvFileStatus) {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(state) => {
                let entries = state.len();
                (state, EnvFileStatus::Loaded { entries })
            }
            Err(ConfigError::ReadFile(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Env file not found, all keys start unset");
                (Self::default(), EnvFileStatus::NotFound)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Env file unreadable, all keys start unset");
                (Self::default(), EnvFileStatus::Unreadable(e.to_string()))
            }
        }
    }

    /// Override `keys` with the non-empty values found in `source`.
    ///
    /// Returns how many keys were overridden.
    pub fn overlay<S: EnvSource + ?Sized>(&mut self, source: &S, keys: &[&str]) -> usize {
        let mut applied = 0;
        for key in keys {
            let Some(value) = source.var(key) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            debug!(key = %key, "Process environment overrides env file");
            self.values.insert((*key).to_string(), value.to_string());
            applied += 1;
        }
        applied
    }

    /// Raw value of `key`, if assigned.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of `key` when it is assigned a non-blank string.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Location of the env file: `ENVCHECK_FILE` if set, otherwise `.env`.
pub fn env_file_path<S: EnvSource + ?Sized>(source: &S) -> PathBuf {
    source
        .var(ENV_FILE_VAR)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_PATH))
}

#[cfg(test)]
mod tests;
