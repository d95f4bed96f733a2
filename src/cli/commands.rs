//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands return their
//! output as a string; only the interactive shell prints directly.

use crate::agent::{self, Conversation, PromptSet};
use crate::calc;
use crate::cli::output::{
    OutputFormat, format_calc_result, format_message,
};
use crate::cli::parser::{Cli, Commands};
use crate::cli::repl;
use crate::core::{ChatMessage, History};
use crate::error::{CommandError, Error, Result};
use crate::exec::Runner;
use crate::provider::ModelProvider;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Eval { expression } => cmd_eval(expression, format),
        Commands::Ask { question } => cmd_ask(cli, question, format),
        Commands::Render { file, no_exec } => cmd_render(file.as_deref(), *no_exec, format),
        Commands::Repl => repl::run(cli),
    }
}

/// Builds the configured model provider.
pub(crate) fn build_provider(cli: &Cli) -> Result<Box<dyn ModelProvider>> {
    #[cfg(feature = "openai")]
    {
        let provider =
            crate::provider::OpenAiProvider::from_env(&cli.model, cli.base_url.as_deref())?;
        Ok(Box::new(provider))
    }

    #[cfg(not(feature = "openai"))]
    {
        let _ = cli;
        Err(crate::error::ProviderError::Unavailable(
            "this build has no model provider (enable the 'openai' feature)".to_string(),
        )
        .into())
    }
}

/// Builds the single-threaded runtime used to drive one agent turn.
pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            CommandError::ExecutionFailed(format!("failed to start runtime: {e}")).into()
        })
}

// ==================== Command Implementations ====================

fn cmd_eval(expression: &str, format: OutputFormat) -> Result<String> {
    match calc::evaluate(expression) {
        Ok(value) => Ok(format_calc_result(expression, &value, format)),
        // Blank input is short-circuited silently, nothing to show
        Err(Error::EmptyInput) => Ok(String::new()),
        Err(e) => Err(e),
    }
}

fn cmd_ask(cli: &Cli, question: &str, format: OutputFormat) -> Result<String> {
    if question.trim().is_empty() {
        return Ok(String::new());
    }

    let provider = build_provider(cli)?;
    let prompts = PromptSet::load(cli.prompt_dir.as_deref());
    let runner = Runner::new();
    let mut conversation = Conversation::new();
    let mut history = History::new();

    let runtime = build_runtime()?;
    let outcome = runtime.block_on(agent::run_turn(
        &mut conversation,
        provider.as_ref(),
        &runner,
        &mut history,
        &prompts,
        question,
        |segments| {
            debug!(
                reasoning_len = segments.reasoning.len(),
                answer_len = segments.answer.len(),
                "increment applied"
            );
        },
    ));

    match outcome {
        // A transport failure is shown through the message's terminal
        // notice rather than a process error
        Ok(()) | Err(Error::Stream(_)) => {}
        Err(e) => return Err(e),
    }

    let message = conversation
        .last_model_message()
        .ok_or_else(|| CommandError::ExecutionFailed("no response message".to_string()))?;
    Ok(format_message(message, format))
}

fn cmd_render(file: Option<&Path>, no_exec: bool, format: OutputFormat) -> Result<String> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            CommandError::ExecutionFailed(format!("failed to read {}: {e}", path.display()))
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Ok(String::new());
    }

    let mut message = ChatMessage::model(1, 1);
    message.content = text;

    let runner = Runner::new();
    agent::finalize_message(&mut message, (!no_exec).then_some(&runner));

    Ok(format_message(&message, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(command: Commands) -> Cli {
        Cli {
            verbose: false,
            format: "text".to_string(),
            model: "test-model".to_string(),
            base_url: None,
            prompt_dir: None,
            command,
        }
    }

    #[test]
    fn test_eval_command() {
        let cli = cli_for(Commands::Eval {
            expression: "2 + 2".to_string(),
        });
        let output = execute(&cli).unwrap();
        assert_eq!(output, "4\n");
    }

    #[test]
    fn test_eval_empty_is_silent() {
        let cli = cli_for(Commands::Eval {
            expression: "   ".to_string(),
        });
        let output = execute(&cli).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_eval_invalid_is_an_error() {
        let cli = cli_for(Commands::Eval {
            expression: "1 +".to_string(),
        });
        assert!(execute(&cli).is_err());
    }

    #[test]
    fn test_render_executes_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.txt");
        std::fs::write(
            &path,
            "thinking===EQUALS===Result:\n```javascript:exec\nreturn 6*7;\n```\n",
        )
        .unwrap();

        let cli = cli_for(Commands::Render {
            file: Some(path),
            no_exec: false,
        });
        let output = execute(&cli).unwrap();
        assert!(output.contains("=> 42"));
    }

    #[test]
    fn test_render_no_exec_skips_execution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.txt");
        std::fs::write(
            &path,
            "t===EQUALS===```javascript:exec\nreturn 6*7;\n```\n",
        )
        .unwrap();

        let cli = cli_for(Commands::Render {
            file: Some(path),
            no_exec: true,
        });
        let output = execute(&cli).unwrap();
        assert!(output.contains("(not executed)"));
        assert!(!output.contains("=> 42"));
    }
}
