//! Line-oriented shell over the year book and its statistics.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
