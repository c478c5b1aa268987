//! Setting sets: the capability the resolver works against.
//!
//! A [`SettingSet`] exposes, for each declared setting, whether it was
//! explicitly assigned, its current and default values, and a validated
//! way to assign it. The resolver never touches typed values directly;
//! everything crosses this boundary as strings.
//!
//! [`FlagSet`] is the provided implementation. It declares typed flags and
//! tokenizes a command line through `clap`.

mod flag_set;
mod value;

#[cfg(test)]
#[path = "flag_set_tests.rs"]
mod tests;

pub use flag_set::FlagSet;
pub use value::{SettingKind, SettingValue};

use std::ffi::OsString;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised by a [`SettingSet`] when declaring, assigning, or parsing.
#[derive(Debug, Error)]
pub enum SettingError {
    /// The setting is not declared in this set.
    #[error("Unknown setting '{name}'")]
    Unknown {
        /// Name that was looked up
        name: String,
    },

    /// The value could not be coerced into the setting's kind.
    #[error("Invalid value '{value}' for {kind} setting '{name}': {reason}")]
    Invalid {
        /// Setting name
        name: String,
        /// Rejected value
        value: String,
        /// Declared kind of the setting
        kind: SettingKind,
        /// Reason reported by the parser
        reason: String,
    },

    /// Command-line tokenizing failed.
    #[error("{0}")]
    Args(#[from] clap::Error),
}

/// Capability over a group of declared settings.
///
/// Implementations own the typed values and the "explicitly assigned"
/// bookkeeping; callers only see string forms.
pub trait SettingSet {
    /// Names of all declared settings, in declaration order.
    fn declared(&self) -> Vec<String>;

    /// Returns `true` if the setting was assigned by the command line or by
    /// an earlier call to [`SettingSet::assign`].
    fn is_explicit(&self, name: &str) -> bool;

    /// Current value in string form, or `None` if the setting is unknown.
    fn current_value(&self, name: &str) -> Option<String>;

    /// Declared default in string form, or `None` if the setting is unknown.
    fn default_value(&self, name: &str) -> Option<String>;

    /// Parses and stores `value`, marking the setting as explicitly assigned.
    ///
    /// # Errors
    ///
    /// Returns [`SettingError::Unknown`] for undeclared names and
    /// [`SettingError::Invalid`] when the value does not fit the setting.
    fn assign(&mut self, name: &str, value: &str) -> Result<(), SettingError>;

    /// Returns `true` once command-line arguments have been parsed.
    fn is_parsed(&self) -> bool;

    /// Tokenizes `args` (including the program name) and assigns every
    /// setting present on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenizing fails or a value is rejected.
    fn parse_args(&mut self, args: Vec<OsString>) -> Result<(), SettingError>;
}

impl dyn SettingSet + '_ {
    /// Reads the current value of `name` parsed as `T`.
    ///
    /// Returns `None` if the setting is unknown or does not parse.
    pub fn get<T: FromStr>(&self, name: &str) -> Option<T> {
        self.current_value(name)?.parse().ok()
    }
}
