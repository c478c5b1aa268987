//! Application startup and utilities.
//!
//! Exit codes, tracing setup, and error hints for the `flagconf` binary.

use flagconf::ConfigError;
use flagconf::cli::CliError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - bad value, missing key, unreadable
    /// or malformed file, no file selected.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// I/O error (exit code 2) - the config file, its directory, or output
    /// could not be written.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn io_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Maps a failed command to its exit code.
pub fn exit_code_for(error: &CliError) -> std::process::ExitCode {
    let io = match error {
        CliError::Config(e) => e.is_io(),
        CliError::Output(_) => true,
        _ => false,
    };

    if io {
        exit_code::io_error()
    } else {
        exit_code::CONFIG_ERROR
    }
}

/// Prints helpful hints for common errors.
pub fn print_hint(error: &CliError) {
    match error {
        CliError::Config(ConfigError::UserLookup) | CliError::MissingSource => {
            eprintln!("\nUse --file to point at a config file explicitly.");
        }
        CliError::Config(ConfigError::FileRead(_)) => {
            eprintln!("\nCheck that the file exists and is valid TOML.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
