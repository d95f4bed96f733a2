//! System prompt for the calculator agent.
//!
//! The prompt carries the two negotiated contracts the parsing pipeline
//! depends on: the literal answer separator, emitted exactly once between
//! reasoning and answer, and the executable fence tag for runnable blocks.

use std::path::Path;

/// System prompt instructing the model to follow the separator and
/// executable-fence contracts.
pub const AGENT_SYSTEM_PROMPT: &str = r#"You are the agent mode of a calculator. Answer the user's mathematical question.

## Response format

1. First, reason through the problem step by step. This text is shown as working notes.
2. Then emit the literal marker ===EQUALS=== exactly once, on its own.
3. After the marker, give the final answer. Everything after the marker is rendered for the user.

Never emit ===EQUALS=== more than once, and never omit it.

## Runnable code

Inside the final answer you may include runnable blocks to compute or visualize results. Tag them exactly like this:

```javascript:exec
return 2 + 2;
```

Each block is executed once as a function body. Available bindings, and nothing else:

- math: abs, sqrt, cbrt, sin, cos, tan, asin, acos, atan, atan2, log, log10, exp, pow, floor, ceil, round, factorial, min, max, PI, E
- ss: mean, median, sum, min, max, variance, standardDeviation (each takes one array of numbers)
- Algebrite: run(expression) evaluates an expression string
- Plotly: newPlot(container, traces, layout) draws a plot
- Chart: new Chart(container, config) draws a chart
- container: the output surface; container.append(text) adds text

Return a value to display it, or only draw on the container and return nothing. Do not reference any other globals, do not attempt I/O.

## Constraints

- Keep reasoning brief and factual.
- Prefer one runnable block per distinct computation or visual.
- Untagged code fences are shown as text and never executed."#;

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/abacus-rs/prompts";

/// Filename for the agent prompt template.
const AGENT_FILENAME: &str = "agent.md";

/// The system prompt set for agent mode.
///
/// Loaded from an external template file when available, falling back to
/// the compiled-in default. Use [`PromptSet::load`] to resolve the prompt
/// directory from CLI flags, environment variables, or the default path.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// System prompt for the calculator agent.
    pub agent: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to the
    /// compiled-in default.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from `--prompt-dir` CLI flag)
    /// 2. `ABACUS_PROMPT_DIR` environment variable
    /// 3. `~/.config/abacus-rs/prompts/`
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(std::path::PathBuf::from)
            .or_else(|| {
                std::env::var("ABACUS_PROMPT_DIR")
                    .ok()
                    .map(std::path::PathBuf::from)
            })
            .or_else(|| dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR)));

        let agent = resolved_dir
            .as_ref()
            .map(|dir| dir.join(AGENT_FILENAME))
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .unwrap_or_else(|| AGENT_SYSTEM_PROMPT.to_string());

        Self { agent }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            agent: AGENT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ANSWER_SEPARATOR, EXEC_TAG};

    #[test]
    fn test_prompt_carries_contracts() {
        assert!(AGENT_SYSTEM_PROMPT.contains(ANSWER_SEPARATOR));
        assert!(AGENT_SYSTEM_PROMPT.contains(EXEC_TAG));
    }

    #[test]
    fn test_prompt_names_capabilities() {
        for name in crate::exec::CAPABILITY_NAMES {
            assert!(AGENT_SYSTEM_PROMPT.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_defaults() {
        let prompts = PromptSet::defaults();
        assert_eq!(prompts.agent, AGENT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_load_from_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(AGENT_FILENAME), "custom prompt").unwrap();

        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.agent, "custom prompt");
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.agent, AGENT_SYSTEM_PROMPT);
    }
}
