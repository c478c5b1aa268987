//! Conventional config file locations.
//!
//! - User file: `<home>/.config/<app>/config.toml`
//! - Global file: `/etc/<app>/config.toml`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::store::StoreError;

/// File name used inside both config directories.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Root of system-wide config directories.
pub const GLOBAL_CONFIG_ROOT: &str = "/etc";

/// User and global config locations for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory holding the user file
    pub user_dir: PathBuf,
    /// Per-user config file
    pub user_file: PathBuf,
    /// System-wide config file
    pub global_file: PathBuf,
}

impl AppPaths {
    /// Derives paths for `app_name` under the current user's home directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UserLookup`] if the home directory is unknown.
    pub fn for_app(app_name: &str) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::UserLookup)?;
        Ok(Self::with_home(&home, app_name))
    }

    /// Derives paths for `app_name` under an explicit home directory.
    #[must_use]
    pub fn with_home(home: &Path, app_name: &str) -> Self {
        let user_dir = home.join(".config").join(app_name);
        Self {
            user_file: user_dir.join(CONFIG_FILE_NAME),
            user_dir,
            global_file: Path::new(GLOBAL_CONFIG_ROOT)
                .join(app_name)
                .join(CONFIG_FILE_NAME),
        }
    }

    /// Creates the user directory and an empty user file if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryCreate`] or [`ConfigError::FileWrite`].
    pub fn prepare(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.user_dir).map_err(|source| {
            ConfigError::DirectoryCreate {
                path: self.user_dir.clone(),
                source,
            }
        })?;

        let created = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.user_file);

        match created {
            Ok(_) => {
                tracing::info!(path = %self.user_file.display(), "Created empty config file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(ConfigError::FileWrite(StoreError::Write {
                path: self.user_file.clone(),
                source,
            })),
        }
    }
}
