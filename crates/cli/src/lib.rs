//! `platelunch` command-line front end: interactive menu and batch commands.

pub mod commands;
pub mod error;
pub mod exit_codes;
pub mod menu;
pub mod tracing_setup;

pub use error::CliError;
