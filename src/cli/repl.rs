//! Interactive calculator shell.
//!
//! Plain lines are evaluated as expressions; `:ask` runs an agent turn over
//! the shared conversation. Both paths record into one history list.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use crate::agent::{self, Conversation, PromptSet};
use crate::calc;
use crate::cli::commands::{build_provider, build_runtime};
use crate::cli::output::{OutputFormat, format_history, format_message};
use crate::cli::parser::Cli;
use crate::core::{EntryKind, History};
use crate::error::{Error, Result};
use crate::exec::Runner;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  <expression>        evaluate a calculator expression
  :ask <question>     ask the model (agent mode)
  :history [pattern]  show recent calculations, optionally regex-filtered
  :clear              clear conversation and history
  :help               show this help
  :quit               exit
";

/// Runs the interactive shell until EOF or `:quit`.
///
/// # Errors
///
/// Returns an error only for terminal I/O failures; evaluation and agent
/// errors are reported inline and the shell continues.
pub fn run(cli: &Cli) -> Result<String> {
    let prompts = PromptSet::load(cli.prompt_dir.as_deref());
    let runner = Runner::new();
    let mut conversation = Conversation::new();
    let mut history = History::new();

    println!("abacus-rs {} - :help for commands", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();

        match line {
            "" => {}
            ":quit" | ":exit" => break,
            ":help" => print!("{HELP}"),
            _ if line.starts_with(":history") => {
                show_history(&history, line[":history".len()..].trim());
            }
            ":clear" => {
                conversation.clear();
                history.clear();
                println!("cleared");
            }
            _ if line.starts_with(":ask") => {
                let question = line[":ask".len()..].trim();
                ask(
                    cli,
                    &prompts,
                    &runner,
                    &mut conversation,
                    &mut history,
                    question,
                );
            }
            _ if line.starts_with(':') => println!("unknown command, :help for commands"),
            expression => evaluate(expression, &mut history),
        }
    }

    Ok(String::new())
}

/// Prints history entries, optionally filtered by a case-insensitive
/// regex over expressions and results.
fn show_history(history: &History, pattern: &str) {
    if pattern.is_empty() {
        print!("{}", format_history(history, OutputFormat::Text));
        return;
    }

    let re = match regex::RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(e) => {
            println!("error: invalid pattern: {e}");
            return;
        }
    };

    let matched: Vec<_> = history
        .entries()
        .filter(|e| re.is_match(&e.expression) || re.is_match(&e.result))
        .collect();
    if matched.is_empty() {
        println!("No matching entries.");
        return;
    }
    for entry in matched {
        println!("  [{}] {} = {}", entry.kind.label(), entry.expression, entry.result);
    }
}

/// Evaluates one manual expression and records it.
fn evaluate(expression: &str, history: &mut History) {
    match calc::evaluate(expression) {
        Ok(value) => {
            let rendered = value.to_string();
            println!("{rendered}");
            history.record(expression, rendered, EntryKind::Manual);
        }
        Err(Error::EmptyInput) => {}
        Err(e) => println!("error: {e}"),
    }
}

/// Runs one agent turn, streaming a progress indicator while reasoning
/// arrives.
fn ask(
    cli: &Cli,
    prompts: &PromptSet,
    runner: &Runner,
    conversation: &mut Conversation,
    history: &mut History,
    question: &str,
) {
    if question.is_empty() {
        return;
    }

    let provider = match build_provider(cli) {
        Ok(provider) => provider,
        Err(e) => {
            println!("error: {e}");
            return;
        }
    };
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            println!("error: {e}");
            return;
        }
    };

    let mut shown = 0usize;
    let outcome = runtime.block_on(agent::run_turn(
        conversation,
        provider.as_ref(),
        runner,
        history,
        prompts,
        question,
        |segments| {
            // Live "thinking" display: print reasoning as it grows
            let reasoning = &segments.reasoning;
            if reasoning.len() > shown {
                print!("{}", &reasoning[shown..]);
                let _ = io::stdout().flush();
                shown = reasoning.len();
            }
        },
    ));
    if shown > 0 {
        println!();
    }

    match outcome {
        Ok(()) | Err(Error::Stream(_)) => {
            if let Some(message) = conversation.last_model_message() {
                print!("{}", format_message(message, OutputFormat::Text));
            }
        }
        Err(e) => println!("error: {e}"),
    }
}
