//! Reasoning/answer segments derived from a streaming response buffer.
//!
//! A model reply is a single growing buffer that carries the model's working
//! notes first, then a separator marker, then the final answer. Segments are
//! views derived from the full buffer; they are never stored independently
//! and never patched incrementally.

use serde::{Deserialize, Serialize};

/// Marker the model is instructed to emit exactly once, between its
/// reasoning and its final answer.
///
/// This literal is the sole contract between the agent system prompt and the
/// segment splitter.
pub const ANSWER_SEPARATOR: &str = "===EQUALS===";

/// The two logical parts of a model reply.
///
/// While the separator has not yet fully arrived, the entire buffer is
/// treated as reasoning: the interface shows "thinking" text live and only
/// reveals the answer once the marker is complete.
///
/// # Examples
///
/// ```
/// use abacus_rs::parse::splitter;
/// use abacus_rs::core::ANSWER_SEPARATOR;
///
/// let segments = splitter::derive("thinking===EQUALS===42", ANSWER_SEPARATOR);
/// assert_eq!(segments.reasoning, "thinking");
/// assert_eq!(segments.answer, "42");
/// assert!(segments.separator_found);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segments {
    /// Text before the first separator occurrence (whole buffer if absent).
    pub reasoning: String,

    /// Text after the first separator occurrence (empty if absent).
    pub answer: String,

    /// Whether the separator has appeared in the buffer at least once.
    pub separator_found: bool,
}

impl Segments {
    /// Creates segments for a buffer in which the separator never appeared.
    #[must_use]
    pub const fn reasoning_only(reasoning: String) -> Self {
        Self {
            reasoning,
            answer: String::new(),
            separator_found: false,
        }
    }

    /// Returns true if neither segment carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reasoning.is_empty() && self.answer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_only() {
        let segments = Segments::reasoning_only("partial thought".to_string());
        assert_eq!(segments.reasoning, "partial thought");
        assert_eq!(segments.answer, "");
        assert!(!segments.separator_found);
    }

    #[test]
    fn test_is_empty() {
        assert!(Segments::default().is_empty());
        assert!(!Segments::reasoning_only("x".to_string()).is_empty());
    }

    #[test]
    fn test_serialization() {
        let segments = Segments {
            reasoning: "r".to_string(),
            answer: "a".to_string(),
            separator_found: true,
        };
        let json = serde_json::to_string(&segments);
        assert!(json.is_ok());
    }
}
