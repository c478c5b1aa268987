//! In-memory layered config store.
//!
//! A [`ConfigStore`] is a two-level mapping (namespace → key → value) that
//! mirrors one backing file. The root namespace is stored under `""`; the
//! alias `"default"` is accepted everywhere a namespace is taken.
//!
//! Loading and committing live in [`file`]; the on-disk format lives in
//! [`codec`].

pub mod codec;
pub mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::{commit, load, load_optional};

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Namespace name that aliases the root namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Normalizes a namespace identifier: `"default"` maps to the root (`""`).
#[must_use]
pub fn normalize_namespace(namespace: &str) -> &str {
    if namespace == DEFAULT_NAMESPACE {
        ""
    } else {
        namespace
    }
}

/// Errors raised while loading, rendering, or committing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The backing file is not valid TOML.
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// Path to the config file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// The backing file is valid TOML but does not describe a store.
    #[error("Unsupported value for '{key}' in '{}': {reason}", path.display())]
    Malformed {
        /// Path to the config file
        path: PathBuf,
        /// Offending key, `namespace.key` for non-root entries
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The backing file could not be written.
    #[error("Failed to write config file '{}': {source}", path.display())]
    Write {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The store could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Two-level string store: namespace → key → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key` in `namespace`.
    #[must_use]
    pub fn get_string(&self, namespace: &str, key: &str) -> Option<&str> {
        self.sections
            .get(normalize_namespace(namespace))?
            .get(key)
            .map(String::as_str)
    }

    /// Inserts or replaces `key` in `namespace`.
    pub fn set_string(&mut self, namespace: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(normalize_namespace(namespace).to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Removes `key` from `namespace`. Returns `true` if an entry was removed.
    ///
    /// A namespace left without keys is dropped as well.
    pub fn delete(&mut self, namespace: &str, key: &str) -> bool {
        let namespace = normalize_namespace(namespace);
        let Some(section) = self.sections.get_mut(namespace) else {
            return false;
        };

        let removed = section.remove(key).is_some();
        if section.is_empty() {
            self.sections.remove(namespace);
        }
        removed
    }

    /// Combines a user store and a global store; user values win.
    #[must_use]
    pub fn merge(user: &Self, global: &Self) -> Self {
        let mut merged = global.clone();
        for (namespace, section) in &user.sections {
            let target = merged.sections.entry(namespace.clone()).or_default();
            for (key, value) in section {
                target.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Iterates over namespaces that hold at least one key.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Iterates over the key/value pairs of `namespace`, sorted by key.
    pub fn entries(&self, namespace: &str) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .get(normalize_namespace(namespace))
            .into_iter()
            .flat_map(|section| section.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Total number of entries across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
