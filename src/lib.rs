//! flagconf: layered flag configuration
//!
//! Resolves flag values from the command line, the environment, a per-user
//! config file and a system-wide config file, and persists changes back to
//! the user file.

pub mod cli;
pub mod env;
mod error;
mod layered;
pub mod paths;
pub mod registry;
pub mod resolve;
pub mod settings;
pub mod store;


pub use error::ConfigError;
pub use layered::{LayeredConfig, Options};
