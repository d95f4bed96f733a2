//! Conversation messages.
//!
//! A model message owns the raw response buffer for exactly one in-flight
//! request. The buffer grows append-only while streaming and is frozen when
//! the token source completes; reasoning/answer segments are re-derived from
//! the full buffer on every read.

use crate::core::segment::{ANSWER_SEPARATOR, Segments};
use crate::core::unit::ContentUnit;
use crate::exec::ExecutionSlot;
use serde::{Deserialize, Serialize};

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human operating the calculator.
    User,
    /// The language model.
    Model,
}

/// A content unit paired with its execution state.
///
/// Prose units carry no execution slot. Executable units each own one slot,
/// keyed by unit identity rather than content: two textually identical
/// blocks in the same message execute independently, and a unit whose slot
/// has settled is never executed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedUnit {
    /// The parsed content unit.
    pub unit: ContentUnit,

    /// Execution state for executable units, `None` for prose.
    pub execution: Option<ExecutionSlot>,
}

impl RenderedUnit {
    /// Wraps a parsed unit, attaching a pending execution slot to
    /// executable units.
    #[must_use]
    pub fn new(unit: ContentUnit) -> Self {
        let execution = unit.is_executable().then(ExecutionSlot::new);
        Self { unit, execution }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identity within the conversation.
    pub id: u64,

    /// Message author.
    pub role: Role,

    /// Message text. For model messages this is the raw response buffer
    /// (reasoning, separator, and answer combined).
    pub content: String,

    /// Whether tokens are still arriving for this message.
    pub streaming: bool,

    /// Request generation that owns this message's buffer. Fragments from a
    /// superseded generation must never mutate it.
    pub generation: u64,

    /// Rendered units, populated once the message is finalized.
    pub units: Vec<RenderedUnit>,
}

impl ChatMessage {
    /// Creates a completed user message.
    #[must_use]
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: text.into(),
            streaming: false,
            generation: 0,
            units: Vec::new(),
        }
    }

    /// Creates an empty, in-flight model message owned by `generation`.
    #[must_use]
    pub const fn model(id: u64, generation: u64) -> Self {
        Self {
            id,
            role: Role::Model,
            content: String::new(),
            streaming: true,
            generation,
            units: Vec::new(),
        }
    }

    /// Derives the reasoning/answer segments from the current buffer.
    ///
    /// Recomputed from scratch on every call; a separator split across two
    /// arrival increments resolves correctly once both are present.
    #[must_use]
    pub fn segments(&self) -> Segments {
        crate::parse::splitter::derive(&self.content, ANSWER_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ChatMessage::user(1, "2+2");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "2+2");
        assert!(!msg.streaming);
    }

    #[test]
    fn test_model_message_starts_streaming() {
        let msg = ChatMessage::model(2, 7);
        assert_eq!(msg.role, Role::Model);
        assert!(msg.streaming);
        assert!(msg.content.is_empty());
        assert_eq!(msg.generation, 7);
    }

    #[test]
    fn test_segments_before_separator() {
        let mut msg = ChatMessage::model(1, 1);
        msg.content.push_str("still thinking");
        let segments = msg.segments();
        assert_eq!(segments.reasoning, "still thinking");
        assert_eq!(segments.answer, "");
        assert!(!segments.separator_found);
    }

    #[test]
    fn test_segments_after_separator() {
        let mut msg = ChatMessage::model(1, 1);
        msg.content.push_str("work===EQUALS===done");
        let segments = msg.segments();
        assert_eq!(segments.reasoning, "work");
        assert_eq!(segments.answer, "done");
    }

    #[test]
    fn test_rendered_unit_slot_assignment() {
        let prose = RenderedUnit::new(ContentUnit::Prose {
            text: "hi".to_string(),
            span: 0..2,
        });
        assert!(prose.execution.is_none());

        let exec = RenderedUnit::new(ContentUnit::Executable {
            code: "return 1;".to_string(),
            span: 2..30,
        });
        assert!(exec.execution.is_some());
    }
}
