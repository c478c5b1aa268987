//! Environment abstraction for testability.
//!
//! This module provides an [`Environment`] trait so tests can inject
//! variables without touching the process environment, and the naming
//! rule that maps a namespaced setting to a variable name.

use std::collections::HashMap;

/// Source of environment variables.
pub trait Environment {
    /// Returns the value of `key`, or `None` if unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// Production environment backed by [`std::env::var`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment.
///
/// # Example
///
/// ```
/// use flagconf::env::{Environment, MapEnv};
///
/// let env = MapEnv::new().with("APP_PORT", "8080");
/// assert_eq!(env.var("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.var("APP_HOST"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Builds the environment variable name for a setting.
///
/// The result is `PREFIX` + `NAMESPACE_` + `SETTING`, upper-cased, with `.`
/// and `-` in the setting name replaced by `_`. The namespace segment is
/// omitted for the root namespace (`""` or `"default"`).
///
/// Returns `None` when `prefix` is empty: environment lookup is disabled.
///
/// ```
/// use flagconf::env::env_key;
///
/// assert_eq!(env_key("CUSTOM_", "custom", "b").as_deref(), Some("CUSTOM_CUSTOM_B"));
/// assert_eq!(env_key("app_", "", "log-level").as_deref(), Some("APP_LOG_LEVEL"));
/// assert_eq!(env_key("", "custom", "b"), None);
/// ```
#[must_use]
pub fn env_key(prefix: &str, namespace: &str, setting: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }

    let namespace = crate::store::normalize_namespace(namespace);
    let setting = setting.replace(['.', '-'], "_");

    let key = if namespace.is_empty() {
        format!("{prefix}{setting}")
    } else {
        format!("{prefix}{namespace}_{setting}")
    };
    Some(key.to_uppercase())
}
