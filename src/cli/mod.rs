//! CLI layer for abacus-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! manual evaluation, agent questions, offline rendering, and the
//! interactive shell.

pub mod commands;
pub mod output;
pub mod parser;
pub mod repl;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
