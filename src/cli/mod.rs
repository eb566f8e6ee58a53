pub mod commands;
pub mod core;
pub mod format;
mod help;
pub mod output;
mod shell;
pub mod table;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
