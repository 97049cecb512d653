//! CLI module for minicon.
//!
//! Reads a datalog program, ranks its views, and prints the rewritings of
//! its query.

pub mod args;
pub mod run;

pub use args::{parse_args, Args, USAGE};
pub use run::{run, run_logged};

use std::fmt;

use crate::config::ConfigError;
use crate::parser::ParseError;
use crate::preferences::PreferenceError;

/// Errors surfaced to the command line.
#[derive(Debug)]
pub enum CliError {
    /// Bad command-line arguments.
    Usage(String),
    /// The program file did not parse.
    Parse(ParseError),
    Preferences(PreferenceError),
    Config(ConfigError),
    Io(std::io::Error),
    /// The program has views but no `?-` query.
    NoQuery,
    /// A record or rewriting could not be rendered.
    Render(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Parse(e) => write!(f, "{}", e),
            CliError::Preferences(e) => write!(f, "{}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::NoQuery => write!(f, "Program has no query (expected a rule starting with '?-')"),
            CliError::Render(msg) => write!(f, "Cannot render output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Preferences(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Usage(_) | CliError::NoQuery | CliError::Render(_) => None,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Parse(e)
    }
}

impl From<PreferenceError> for CliError {
    fn from(e: PreferenceError) -> Self {
        CliError::Preferences(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
