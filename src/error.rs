//! Error type for the layered configuration façade.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::ValueOrigin;
use crate::settings::SettingError;
use crate::store::StoreError;

/// Error type for configuration operations.
///
/// Every error is returned to the immediate caller; nothing is retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A backing file could not be read or parsed during construction.
    #[error(transparent)]
    FileRead(StoreError),

    /// The store could not be written back to its backing file.
    #[error(transparent)]
    FileWrite(StoreError),

    /// The invoking user's home directory could not be determined.
    #[error("Failed to determine the home directory of the current user")]
    UserLookup,

    /// The config directory could not be created.
    #[error("Failed to create config directory '{}': {source}", path.display())]
    DirectoryCreate {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A value from the environment or the store was rejected by its setting.
    #[error("Invalid value '{value}' for '{}' from {origin}: {source}", qualified(.namespace, .setting))]
    InvalidValue {
        /// Namespace of the setting (`""` for root)
        namespace: String,
        /// Setting name
        setting: String,
        /// Rejected value
        value: String,
        /// Where the value came from
        origin: ValueOrigin,
        /// Error reported by the setting
        #[source]
        source: SettingError,
    },

    /// Command-line parsing failed.
    #[error("Invalid command line: {0}")]
    Args(#[source] SettingError),
}

fn qualified(namespace: &str, setting: &str) -> String {
    if namespace.is_empty() {
        setting.to_string()
    } else {
        format!("{namespace}.{setting}")
    }
}

impl ConfigError {
    /// Returns `true` for errors caused by writing files or creating
    /// directories.
    ///
    /// A file that cannot be read or parsed is a configuration error, not an
    /// I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::FileWrite(_) | Self::DirectoryCreate { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::store::StoreError;

    fn io_error() -> std::io::Error {
        std::io::Error::from(std::io::ErrorKind::PermissionDenied)
    }

    #[test]
    fn write_failures_are_io() {
        let write = ConfigError::FileWrite(StoreError::Write {
            path: PathBuf::from("c.toml"),
            source: io_error(),
        });
        let mkdir = ConfigError::DirectoryCreate {
            path: PathBuf::from("dir"),
            source: io_error(),
        };

        assert!(write.is_io());
        assert!(mkdir.is_io());
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let read = ConfigError::FileRead(StoreError::Read {
            path: PathBuf::from("c.toml"),
            source: io_error(),
        });

        assert!(!read.is_io());
        assert!(!ConfigError::UserLookup.is_io());
    }

    #[test]
    fn invalid_value_names_namespace_and_origin() {
        let error = ConfigError::InvalidValue {
            namespace: "net".to_string(),
            setting: "port".to_string(),
            value: "x".to_string(),
            origin: crate::resolve::ValueOrigin::Store,
            source: crate::settings::SettingError::Unknown {
                name: "port".to_string(),
            },
        };

        let message = error.to_string();
        assert!(message.contains("net.port"), "{message}");
    }
}
