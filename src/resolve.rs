//! Precedence resolution.
//!
//! Settings are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit assignment** - Values given on the command line, or applied
//!    by an earlier pass
//! 2. **Environment** - `PREFIX[NAMESPACE_]SETTING`, only when a prefix is set
//! 3. **Store** - The merged user/global config file
//! 4. **Declared default** - Nothing is applied
//!
//! Values go through [`SettingSet::assign`], the same path the command line
//! uses, so a bad value is reported the same way whatever its origin. A
//! failing setting does not stop the pass.

use std::fmt;

use crate::env::{Environment, env_key};
use crate::error::ConfigError;
use crate::registry::NamespaceRegistry;
use crate::settings::SettingSet;
use crate::store::ConfigStore;

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOrigin {
    /// An environment variable
    Environment {
        /// Variable name
        variable: String,
    },
    /// The config store
    Store,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment { variable } => write!(f, "environment variable {variable}"),
            Self::Store => f.write_str("config file"),
        }
    }
}

/// Whether already-assigned settings are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Skip settings that are already explicitly assigned.
    KeepExplicit,
    /// Apply environment and store values even over assigned settings.
    Overwrite,
}

/// The non-command-line sources consulted during a pass.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    /// Merged config store
    pub store: &'a ConfigStore,
    /// Environment variables
    pub env: &'a dyn Environment,
    /// Variable prefix; empty disables environment lookup
    pub env_prefix: &'a str,
}

impl Sources<'_> {
    /// Returns the highest-precedence value for a setting, if any source
    /// has one. Empty environment values count as unset.
    #[must_use]
    pub fn lookup(&self, namespace: &str, setting: &str) -> Option<(String, ValueOrigin)> {
        if let Some(variable) = env_key(self.env_prefix, namespace, setting) {
            if let Some(value) = self.env.var(&variable).filter(|v| !v.is_empty()) {
                return Some((value, ValueOrigin::Environment { variable }));
            }
        }

        self.store
            .get_string(namespace, setting)
            .map(|value| (value.to_string(), ValueOrigin::Store))
    }
}

/// Resolves every declared setting of one set.
///
/// Returns the number of settings that received a value.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidValue`] met; every other setting
/// is still visited.
pub fn resolve_set(
    namespace: &str,
    set: &mut dyn SettingSet,
    sources: &Sources<'_>,
    mode: Mode,
) -> Result<usize, ConfigError> {
    let mut applied = 0;
    let mut first_error = None;

    for setting in set.declared() {
        if mode == Mode::KeepExplicit && set.is_explicit(&setting) {
            continue;
        }
        let Some((value, origin)) = sources.lookup(namespace, &setting) else {
            continue;
        };

        match set.assign(&setting, &value) {
            Ok(()) => {
                tracing::debug!(namespace, setting = %setting, %origin, "Applied setting");
                applied += 1;
            }
            Err(error) => {
                tracing::warn!(namespace, setting = %setting, %origin, "{error}");
                first_error.get_or_insert(ConfigError::InvalidValue {
                    namespace: namespace.to_string(),
                    setting,
                    value,
                    origin,
                    source: error,
                });
            }
        }
    }

    first_error.map_or(Ok(applied), Err)
}

/// Runs one resolution pass over every registered namespace.
///
/// Namespaces are independent; their order does not matter.
///
/// # Errors
///
/// Returns the first failure met; all namespaces are still visited.
pub fn resolve_registry(
    registry: &mut NamespaceRegistry,
    sources: &Sources<'_>,
) -> Result<usize, ConfigError> {
    let mut applied = 0;
    let mut first_error = None;

    for (namespace, set) in registry.sets_mut() {
        match resolve_set(namespace, set, sources, Mode::KeepExplicit) {
            Ok(count) => applied += count,
            Err(error) => {
                first_error.get_or_insert(error);
            }
        }
    }

    first_error.map_or(Ok(applied), Err)
}
