//! Command-line interface of the `flagconf` tool.
//!
//! Inspects and edits a backing config file:
//!
//! ```text
//! flagconf --file ./config.toml show
//! flagconf --app demo set net port 8080
//! flagconf --app demo delete default verbose
//! flagconf env-key DEMO_ net port
//! ```
//!
//! The root namespace is written `default`. Every subcommand except
//! `env-key` needs `--file` or `--app`.

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use thiserror::Error;

use crate::settings::FlagSet;
use crate::store::codec;
use crate::{ConfigError, LayeredConfig, Options, env};

/// flagconf: inspect and edit layered flag configuration files
#[derive(Debug, Parser)]
#[command(name = "flagconf")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["file", "app"])))]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Application name: edits ~/.config/<APP>/config.toml, read over /etc/<APP>/config.toml
    #[arg(long)]
    pub app: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for flagconf
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every stored value
    Show {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Print one stored value
    Get {
        /// Namespace (`default` for the root)
        namespace: String,
        /// Setting name
        key: String,
    },
    /// Store a value and persist the file
    Set {
        /// Namespace (`default` for the root)
        namespace: String,
        /// Setting name
        key: String,
        /// Value to store
        value: String,
    },
    /// Remove a value and persist the file
    Delete {
        /// Namespace (`default` for the root)
        namespace: String,
        /// Setting name
        key: String,
    },
    /// Print the environment variable that overrides a setting
    EnvKey {
        /// Environment prefix, e.g. `DEMO_`
        prefix: String,
        /// Namespace (`default` for the root)
        namespace: String,
        /// Setting name
        key: String,
    },
}

/// Errors from running a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, resolving, or persisting failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The requested key is not stored.
    #[error("No value stored for '{key}' in namespace '{namespace}'")]
    NotFound {
        /// Namespace that was searched
        namespace: String,
        /// Missing key
        key: String,
    },

    /// Neither `--file` nor `--app` was given for a command that needs a file.
    #[error("No config file selected: pass --file or --app")]
    MissingSource,

    /// `env-key` was given an empty prefix, which disables env lookup.
    #[error("Environment prefix is empty; no variable overrides '{key}'")]
    EmptyPrefix {
        /// Setting name
        key: String,
    },

    /// Rendering the store failed.
    #[error("Failed to render config: {0}")]
    Render(String),

    /// Writing to the output failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Builds construction options from `--file` or `--app`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingSource`] if neither is given, or an error
    /// if the conventional app paths cannot be prepared.
    pub fn options(&self) -> Result<Options, CliError> {
        match (&self.file, &self.app) {
            (Some(file), _) => Ok(Options::new().with_path(file)),
            (None, Some(app)) => Ok(Options::for_app(app)?),
            (None, None) => Err(CliError::MissingSource),
        }
    }
}

/// Runs the parsed command line, loading the selected file when the
/// command needs one.
///
/// # Errors
///
/// Returns an error if no file is selected, loading fails, or the command
/// fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    if let Command::EnvKey {
        prefix,
        namespace,
        key,
    } = &cli.command
    {
        return write_env_key(prefix, namespace, key, out);
    }

    let mut conf = LayeredConfig::new(cli.options()?, FlagSet::new("flagconf"))?;
    execute(&cli.command, &mut conf, out)
}

/// Runs `command` against `conf`, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the key is missing, persisting fails, or output
/// cannot be written.
pub fn execute(
    command: &Command,
    conf: &mut LayeredConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Show { json } => {
            let text = if *json {
                serde_json::to_string_pretty(conf.store())
                    .map_err(|e| CliError::Render(e.to_string()))?
                    + "\n"
            } else {
                codec::render(conf.store()).map_err(|e| CliError::Render(e.to_string()))?
            };
            out.write_all(text.as_bytes())?;
        }
        Command::Get { namespace, key } => {
            let value = conf
                .store()
                .get_string(namespace, key)
                .ok_or_else(|| CliError::NotFound {
                    namespace: namespace.clone(),
                    key: key.clone(),
                })?;
            writeln!(out, "{value}")?;
        }
        Command::Set {
            namespace,
            key,
            value,
        } => {
            conf.set(namespace, key, value.as_str())?;
            tracing::info!(namespace = %namespace, key = %key, "Stored value");
        }
        Command::Delete { namespace, key } => {
            conf.delete(namespace, key)?;
            tracing::info!(namespace = %namespace, key = %key, "Deleted value");
        }
        Command::EnvKey {
            prefix,
            namespace,
            key,
        } => write_env_key(prefix, namespace, key, out)?,
    }
    Ok(())
}

fn write_env_key(
    prefix: &str,
    namespace: &str,
    key: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let name = env::env_key(prefix, namespace, key).ok_or_else(|| CliError::EmptyPrefix {
        key: key.to_string(),
    })?;
    writeln!(out, "{name}")?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
