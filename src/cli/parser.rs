//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// abacus-rs: agentic calculator REPL.
///
/// Evaluates expressions directly, or streams a model reply and runs the
/// tagged code blocks it contains.
#[derive(Parser, Debug)]
#[command(name = "abacus-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Model identifier for agent mode.
    #[arg(long, env = "ABACUS_MODEL", default_value = "gpt-4o-mini", global = true)]
    pub model: String,

    /// Base URL override for OpenAI-compatible endpoints.
    #[arg(long, env = "ABACUS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Directory with prompt template overrides.
    #[arg(long, env = "ABACUS_PROMPT_DIR", global = true)]
    pub prompt_dir: Option<PathBuf>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a calculator expression.
    Eval {
        /// Expression to evaluate.
        expression: String,
    },

    /// Ask the model a question (agent mode).
    Ask {
        /// The question to send.
        question: String,
    },

    /// Parse a saved model reply and run its code blocks, offline.
    Render {
        /// Path to the reply text (reads stdin if not provided).
        file: Option<PathBuf>,

        /// Skip executing code blocks.
        #[arg(long)]
        no_exec: bool,
    },

    /// Start the interactive shell.
    Repl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        // Test that CLI can be created
        Cli::command().debug_assert();
    }

    #[test]
    fn test_eval_command() {
        let cli = Cli::try_parse_from(["abacus-rs", "eval", "2+2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Eval { ref expression } if expression == "2+2"
        ));
    }

    #[test]
    fn test_render_flags() {
        let cli = Cli::try_parse_from(["abacus-rs", "render", "--no-exec", "reply.txt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Render { ref file, no_exec: true } if file.as_deref()
                == Some(std::path::Path::new("reply.txt"))
        ));
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::try_parse_from(["abacus-rs", "eval", "1", "--format", "json"]).unwrap();
        assert_eq!(cli.format, "json");
    }
}
