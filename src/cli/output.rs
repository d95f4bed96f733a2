//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::calc::CalcValue;
use crate::core::{ChatMessage, ContentUnit, History};
use crate::error::Error;
use crate::exec::{Artifact, ExecutionResult, ExecutionSlot, Outcome};
use serde::Serialize;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a manual calculation result.
#[must_use]
pub fn format_calc_result(expression: &str, value: &CalcValue, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{value}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct CalcOutput<'a> {
                expression: &'a str,
                result: String,
                value: &'a CalcValue,
            }
            format_json(&CalcOutput {
                expression,
                result: value.to_string(),
                value,
            })
        }
    }
}

/// Formats a rendered model message.
#[must_use]
pub fn format_message(message: &ChatMessage, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_message_text(message),
        OutputFormat::Json => format_json(&MessageOutput::from(message)),
    }
}

fn format_message_text(message: &ChatMessage) -> String {
    let segments = message.segments();
    let mut output = String::new();

    if !segments.separator_found {
        // Reasoning-only reply (no marker, or interrupted in transport)
        let _ = writeln!(output, "{}", segments.reasoning);
        return output;
    }

    if !segments.reasoning.is_empty() {
        output.push_str("Reasoning:\n");
        for line in segments.reasoning.lines() {
            let _ = writeln!(output, "  {line}");
        }
        output.push('\n');
    }

    output.push_str("Answer:\n");
    for rendered in &message.units {
        match &rendered.unit {
            ContentUnit::Prose { text, .. } => {
                if !text.is_empty() {
                    let _ = writeln!(output, "{text}");
                }
            }
            ContentUnit::Executable { code, .. } => {
                output.push_str("[code]\n");
                for line in code.lines() {
                    let _ = writeln!(output, "  {line}");
                }
                match rendered.execution.as_ref().and_then(ExecutionSlot::result) {
                    Some(result) => format_execution_text(&mut output, result),
                    None => output.push_str("(not executed)\n"),
                }
            }
        }
    }

    output
}

fn format_execution_text(output: &mut String, result: &ExecutionResult) {
    match &result.outcome {
        Outcome::Completed { value: Some(value) } => {
            let _ = writeln!(output, "=> {value}");
        }
        Outcome::Completed { value: None } => {}
        Outcome::Failed { message } => {
            let _ = writeln!(output, "error: {message}");
        }
    }

    for artifact in &result.surface.artifacts {
        match artifact {
            Artifact::Text { content } => {
                let _ = writeln!(output, "{content}");
            }
            other => {
                let _ = writeln!(output, "[{}]", other.label());
            }
        }
    }
    if !result.surface.html.is_empty() {
        let _ = writeln!(output, "{}", result.surface.html);
    }
}

/// Formats the calculation history.
#[must_use]
pub fn format_history(history: &History, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_history_text(history),
        OutputFormat::Json => format_json(history),
    }
}

fn format_history_text(history: &History) -> String {
    if history.is_empty() {
        return "No history yet.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(output, "History ({} entries):", history.len());
    for entry in history.entries() {
        let _ = writeln!(
            output,
            "  [{}] {} = {}",
            entry.kind.label(),
            truncate(&entry.expression, 40),
            truncate(&entry.result, 60)
        );
    }
    output
}

/// Formats an error.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// JSON shape of a rendered message.
#[derive(Serialize)]
struct MessageOutput<'a> {
    id: u64,
    streaming: bool,
    reasoning: String,
    answer: String,
    units: Vec<UnitOutput<'a>>,
}

#[derive(Serialize)]
struct UnitOutput<'a> {
    #[serde(flatten)]
    unit: &'a ContentUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution: Option<&'a ExecutionResult>,
}

impl<'a> From<&'a ChatMessage> for MessageOutput<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        let segments = message.segments();
        Self {
            id: message.id,
            streaming: message.streaming,
            reasoning: segments.reasoning,
            answer: segments.answer,
            units: message
                .units
                .iter()
                .map(|rendered| UnitOutput {
                    unit: &rendered.unit,
                    execution: rendered.execution.as_ref().and_then(ExecutionSlot::result),
                })
                .collect(),
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Truncates a string to a maximum number of grapheme clusters.
fn truncate(s: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    if graphemes.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        graphemes[..max_len].concat()
    } else {
        format!("{}...", graphemes[..max_len - 3].concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Conversation, PromptSet};
    use crate::core::{EntryKind, Role};

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        // Grapheme-safe on multi-byte input
        assert_eq!(truncate("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_format_calc_result() {
        let value = CalcValue::Integer(4);
        assert_eq!(
            format_calc_result("2+2", &value, OutputFormat::Text),
            "4\n"
        );

        let json = format_calc_result("2+2", &value, OutputFormat::Json);
        assert!(json.contains("\"expression\": \"2+2\""));
        assert!(json.contains("\"result\": \"4\""));
    }

    #[test]
    fn test_format_reasoning_only_message() {
        let mut message = ChatMessage::model(1, 1);
        message.content = "No marker here".to_string();
        message.streaming = false;

        let text = format_message(&message, OutputFormat::Text);
        assert_eq!(text, "No marker here\n");
        assert!(!text.contains("Answer:"));
    }

    #[test]
    fn test_format_full_message() {
        let mut conversation = Conversation::new();
        let runner = crate::exec::Runner::new();
        let mut history = crate::core::History::new();
        let _prompts = PromptSet::defaults();

        let handle = conversation.begin_request("q").unwrap();
        let _ = conversation.apply_increment(
            &handle,
            "Add them.===EQUALS===Sum:\n```javascript:exec\nreturn 1+2;\n```\nDone.",
        );
        conversation
            .complete_request(&handle, &runner, &mut history)
            .unwrap();

        let message = conversation.last_model_message().unwrap();
        assert_eq!(message.role, Role::Model);

        let text = format_message(message, OutputFormat::Text);
        assert!(text.contains("Reasoning:"));
        assert!(text.contains("  Add them."));
        assert!(text.contains("Answer:"));
        assert!(text.contains("[code]"));
        assert!(text.contains("=> 3"));
        assert!(text.contains("Done."));

        let json = format_message(message, OutputFormat::Json);
        assert!(json.contains("\"answer\""));
        assert!(json.contains("\"type\": \"executable\""));
        assert!(json.contains("\"status\": \"completed\""));
    }

    #[test]
    fn test_format_history() {
        let mut history = History::new();
        assert_eq!(
            format_history(&history, OutputFormat::Text),
            "No history yet.\n"
        );

        history.record("2+2", "4", EntryKind::Manual);
        let text = format_history(&history, OutputFormat::Text);
        assert!(text.contains("History (1 entries):"));
        assert!(text.contains("[manual] 2+2 = 4"));
    }

    #[test]
    fn test_format_error() {
        let err = Error::EmptyInput;
        assert_eq!(format_error(&err, OutputFormat::Text), "empty input");
        assert!(format_error(&err, OutputFormat::Json).contains("\"error\""));
    }
}
