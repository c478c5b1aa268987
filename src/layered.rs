//! Layered configuration façade.
//!
//! [`LayeredConfig`] owns the merged store, the namespace registry and the
//! environment source. Typical startup:
//!
//! ```no_run
//! use flagconf::settings::FlagSet;
//! use flagconf::{LayeredConfig, Options};
//!
//! # fn main() -> Result<(), flagconf::ConfigError> {
//! let root = FlagSet::new("demo").float("rate", 1.0, "requests per second");
//! let mut conf = LayeredConfig::new(Options::for_app("demo")?.with_env_prefix("DEMO_"), root)?;
//! conf.register("net", FlagSet::new("net").int("port", 8080, "listen port"));
//! conf.resolve_all()?;
//!
//! let port = conf.namespace("net").and_then(|set| set.get::<i64>("port"));
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::{Environment, ProcessEnv};
use crate::error::ConfigError;
use crate::paths::AppPaths;
use crate::registry::NamespaceRegistry;
use crate::resolve::{self, Mode, Sources};
use crate::settings::SettingSet;
use crate::store::{self, ConfigStore};

/// Construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Backing file; mutations are persisted here. `None` keeps the store
    /// in memory only.
    pub path: Option<PathBuf>,

    /// Read-only global file merged under the backing file.
    ///
    /// A missing file is ignored. A file that exists but cannot be read or
    /// parsed is skipped with a warning; construction still succeeds.
    pub global_path: Option<PathBuf>,

    /// Environment variable prefix. Empty disables environment lookup.
    pub env_prefix: String,
}

impl Options {
    /// Creates in-memory options with environment lookup disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backing file.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the global file.
    #[must_use]
    pub fn with_global_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Options for the conventional user and global files of `app_name`.
    ///
    /// Creates the user config directory and an empty user file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown or the user
    /// directory or file cannot be created.
    pub fn for_app(app_name: &str) -> Result<Self, ConfigError> {
        let paths = AppPaths::for_app(app_name)?;
        paths.prepare()?;
        Ok(paths.into())
    }
}

impl From<AppPaths> for Options {
    fn from(paths: AppPaths) -> Self {
        Self {
            path: Some(paths.user_file),
            global_path: Some(paths.global_file),
            env_prefix: String::new(),
        }
    }
}

/// Settings resolved from command line, environment, and config files.
pub struct LayeredConfig {
    options: Options,
    store: ConfigStore,
    registry: NamespaceRegistry,
    env: Box<dyn Environment>,
    resolved: bool,
}

impl LayeredConfig {
    /// Loads the backing file (merged over the global file, if configured)
    /// and binds `root` to the root namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the backing file cannot be read
    /// or parsed. Problems with the global file are logged and skipped.
    pub fn new(options: Options, root: impl SettingSet + 'static) -> Result<Self, ConfigError> {
        let store = load_store(&options)?;
        tracing::info!(
            path = %display_path(options.path.as_deref()),
            entries = store.len(),
            "Loaded configuration"
        );

        Ok(Self {
            options,
            store,
            registry: NamespaceRegistry::new(Box::new(root)),
            env: Box::new(ProcessEnv),
            resolved: false,
        })
    }

    /// Replaces the environment source (the process environment by default).
    #[must_use]
    pub fn with_environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Binds `set` to `namespace`, replacing any earlier binding.
    pub fn register(&mut self, namespace: &str, set: impl SettingSet + 'static) {
        self.registry.register(namespace, Box::new(set));
    }

    /// Returns the set bound to `namespace`.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&dyn SettingSet> {
        self.registry.get(namespace)
    }

    /// Returns the set bound to `namespace`, mutably.
    pub fn namespace_mut(&mut self, namespace: &str) -> Option<&mut (dyn SettingSet + 'static)> {
        self.registry.get_mut(namespace)
    }

    /// Returns the namespace registry.
    #[must_use]
    pub const fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    /// Returns the merged store.
    #[must_use]
    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Returns the construction options.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Returns `true` if a resolution pass ran since the last mutation.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Runs one resolution pass over every registered namespace.
    ///
    /// Settings already explicitly assigned are left untouched, including
    /// those applied by an earlier pass.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`]; other settings are
    /// still resolved.
    pub fn resolve(&mut self) -> Result<(), ConfigError> {
        let sources = Sources {
            store: &self.store,
            env: &*self.env,
            env_prefix: &self.options.env_prefix,
        };

        let result = resolve::resolve_registry(&mut self.registry, &sources);
        self.resolved = true;

        let applied = result?;
        tracing::debug!(applied, "Resolution pass complete");
        Ok(())
    }

    /// Parses the process arguments into the root set, unless already
    /// parsed, then resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Args`] if the command line is invalid, or any
    /// error from [`LayeredConfig::resolve`].
    pub fn resolve_all(&mut self) -> Result<(), ConfigError> {
        self.resolve_all_from(std::env::args_os())
    }

    /// Like [`LayeredConfig::resolve_all`] with explicit arguments, program
    /// name first.
    ///
    /// # Errors
    ///
    /// See [`LayeredConfig::resolve_all`].
    pub fn resolve_all_from<I, T>(&mut self, args: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        if let Some(root) = self.registry.get_mut("") {
            if !root.is_parsed() {
                let args = args.into_iter().map(Into::into).collect();
                root.parse_args(args).map_err(ConfigError::Args)?;
            }
        }
        self.resolve()
    }

    /// Applies environment and store values to an unregistered set,
    /// overwriting values that were already assigned.
    ///
    /// Returns the number of settings that received a value.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`].
    pub fn apply_to(&self, namespace: &str, set: &mut dyn SettingSet) -> Result<usize, ConfigError> {
        let sources = Sources {
            store: &self.store,
            env: &*self.env,
            env_prefix: &self.options.env_prefix,
        };
        resolve::resolve_set(namespace, set, &sources, Mode::Overwrite)
    }

    /// Stores `value` for `setting` in `namespace` and persists the store.
    ///
    /// The in-memory change is kept even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileWrite`] if the backing file cannot be written.
    pub fn set(
        &mut self,
        namespace: &str,
        setting: &str,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        self.store.set_string(namespace, setting, value);
        self.resolved = false;
        self.commit()
    }

    /// Removes `setting` from `namespace` and persists the store.
    ///
    /// Removing an absent setting still persists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileWrite`] if the backing file cannot be written.
    pub fn delete(&mut self, namespace: &str, setting: &str) -> Result<(), ConfigError> {
        self.store.delete(namespace, setting);
        self.resolved = false;
        self.commit()
    }

    fn commit(&self) -> Result<(), ConfigError> {
        store::commit(&self.store, self.options.path.as_deref()).map_err(ConfigError::FileWrite)
    }
}

impl fmt::Debug for LayeredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredConfig")
            .field("options", &self.options)
            .field("entries", &self.store.len())
            .field("registry", &self.registry)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

fn load_store(options: &Options) -> Result<ConfigStore, ConfigError> {
    let user = store::load(options.path.as_deref()).map_err(ConfigError::FileRead)?;

    let Some(global_path) = options.global_path.as_deref() else {
        return Ok(user);
    };
    match store::load_optional(Some(global_path)) {
        Ok(global) => Ok(ConfigStore::merge(&user, &global)),
        Err(e) => {
            tracing::warn!(
                path = %global_path.display(),
                error = %e,
                "Ignoring global config file"
            );
            Ok(user)
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "none".to_string(), |p| p.display().to_string())
}
