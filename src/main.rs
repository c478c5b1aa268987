//! flagconf: layered flag configuration
//!
//! Entry point for the flagconf tool.

use flagconf::cli::{Cli, run};
use std::process::ExitCode;

mod app;

use app::{exit_code, exit_code_for, print_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            print_hint(&e);
            exit_code_for(&e)
        }
    }
}
