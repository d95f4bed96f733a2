//! Agent turn orchestration.
//!
//! A conversation owns the message list and a monotonically increasing
//! request generation. Each agent turn streams fragments into exactly one
//! model message; starting a new turn bumps the generation, which detaches
//! any still-streaming request: stale fragments no longer mutate a buffer,
//! and abandoned responses never reach the runner.

pub mod prompt;

pub use prompt::{AGENT_SYSTEM_PROMPT, PromptSet};

use crate::core::message::RenderedUnit;
use crate::core::{ChatMessage, ContentUnit, EntryKind, History, Segments};
use crate::error::{Error, Result};
use crate::exec::{ExecutionSlot, Outcome, Runner};
use crate::parse::blocks;
use crate::provider::ModelProvider;
use crate::stream::TokenStreamAdapter;
use tracing::{debug, info, warn};

/// Fixed terminal notice shown in place of a reply that failed in
/// transport.
pub const TRANSPORT_NOTICE: &str = "The response was interrupted before it completed.";

/// Handle to one in-flight agent request.
///
/// Valid only while its generation is current; operations with a stale
/// handle are silent no-ops.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    generation: u64,
    message_id: u64,
    question: String,
}

/// An agent conversation: ordered messages plus request bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    next_message_id: u64,
    generation: u64,
}

impl Conversation {
    /// Creates an empty conversation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_message_id: 0,
            generation: 0,
        }
    }

    /// Returns all messages in order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the most recent model message, if any.
    #[must_use]
    pub fn last_model_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::core::Role::Model)
    }

    /// Drops all messages and detaches any in-flight request.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
    }

    /// Starts a new agent request for `question`.
    ///
    /// Pushes the user message and an empty streaming model message, and
    /// detaches any previous in-flight request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for blank questions, before any
    /// processing.
    pub fn begin_request(&mut self, question: &str) -> Result<RequestHandle> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }

        self.generation += 1;
        let generation = self.generation;

        let user_id = self.alloc_message_id();
        self.messages.push(ChatMessage::user(user_id, trimmed));

        let message_id = self.alloc_message_id();
        self.messages.push(ChatMessage::model(message_id, generation));

        debug!(generation, "agent request started");
        Ok(RequestHandle {
            generation,
            message_id,
            question: trimmed.to_string(),
        })
    }

    /// Appends one arrived fragment to the request's buffer and returns the
    /// re-derived segments.
    ///
    /// Returns `None` when the handle's request has been superseded: stale
    /// fragments never mutate a buffer.
    pub fn apply_increment(&mut self, handle: &RequestHandle, fragment: &str) -> Option<Segments> {
        if handle.generation != self.generation {
            debug!(generation = handle.generation, "dropping stale fragment");
            return None;
        }
        let message = self.message_mut(handle.message_id)?;
        message.content.push_str(fragment);
        Some(message.segments())
    }

    /// Marks the request as failed in transport.
    ///
    /// Replaces the in-progress content with the fixed terminal notice and
    /// clears the streaming flag. No retry is attempted.
    pub fn fail_request(&mut self, handle: &RequestHandle, reason: &str) {
        if handle.generation != self.generation {
            return;
        }
        if let Some(message) = self.message_mut(handle.message_id) {
            warn!(reason, "transport failure on in-flight message");
            message.content = TRANSPORT_NOTICE.to_string();
            message.streaming = false;
        }
    }

    /// Finalizes a completed request.
    ///
    /// Freezes the message, extracts content units from the answer segment,
    /// executes each executable unit at most once, and records the turn in
    /// history. Returns `None` for superseded requests, which are never
    /// executed.
    pub fn complete_request(
        &mut self,
        handle: &RequestHandle,
        runner: &Runner,
        history: &mut History,
    ) -> Option<&ChatMessage> {
        if handle.generation != self.generation {
            debug!(
                generation = handle.generation,
                "dropping completion of superseded request"
            );
            return None;
        }

        let message = self.message_mut(handle.message_id)?;
        if !message.streaming {
            // Already finalized (or replaced by the transport notice);
            // never rebuild units or re-execute
            return self.message(handle.message_id);
        }
        let segments = message.segments();
        finalize_message(message, Some(runner));

        let unit_count = message.units.len();
        let failures = message
            .units
            .iter()
            .filter_map(|u| u.execution.as_ref())
            .filter_map(ExecutionSlot::result)
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
            .count();

        // A reply without the separator is reasoning-only; record what the
        // user actually sees
        let result_text = if segments.separator_found {
            segments.answer
        } else {
            segments.reasoning
        };
        history.record(handle.question.clone(), result_text, EntryKind::Agent);

        info!(units = unit_count, failures, "agent turn completed");
        self.message(handle.message_id)
    }

    fn alloc_message_id(&mut self) -> u64 {
        self.next_message_id += 1;
        self.next_message_id
    }

    fn message(&self, id: u64) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn message_mut(&mut self, id: u64) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

/// Freezes a message buffer, extracts content units from its answer
/// segment, and, when a runner is given, executes each executable unit at
/// most once.
///
/// Live turns reach this through [`Conversation::complete_request`]; the
/// offline render path calls it directly on a synthesized message.
pub fn finalize_message(message: &mut ChatMessage, runner: Option<&Runner>) {
    message.streaming = false;

    let segments = message.segments();
    message.units = blocks::extract(&segments.answer)
        .into_iter()
        .map(RenderedUnit::new)
        .collect();

    if let Some(runner) = runner {
        for rendered in &mut message.units {
            if let (ContentUnit::Executable { code, .. }, Some(slot)) =
                (&rendered.unit, rendered.execution.as_mut())
            {
                slot.run_once(runner, code);
            }
        }
    }
}

/// Drives one full agent turn: open the provider stream, apply increments
/// as they arrive, then finalize and execute.
///
/// `on_update` runs after every applied increment with the freshly derived
/// segments, for live "thinking" display.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for blank questions, a provider error when
/// the stream cannot be opened, or the transport failure that interrupted
/// the stream. In the transport case the conversation already carries the
/// terminal notice.
pub async fn run_turn<F>(
    conversation: &mut Conversation,
    provider: &dyn ModelProvider,
    runner: &Runner,
    history: &mut History,
    prompts: &PromptSet,
    question: &str,
    mut on_update: F,
) -> Result<()>
where
    F: FnMut(&Segments),
{
    let handle = conversation.begin_request(question)?;
    info!(provider = provider.name(), "opening agent stream");

    let stream = match provider.stream_response(&prompts.agent, question).await {
        Ok(stream) => stream,
        Err(e) => {
            conversation.fail_request(&handle, &e.to_string());
            return Err(e.into());
        }
    };

    let mut adapter = TokenStreamAdapter::new(stream);
    loop {
        match adapter.next_increment().await {
            Some(Ok(increment)) => {
                let Some(segments) = conversation.apply_increment(&handle, &increment.fragment)
                else {
                    // Superseded mid-stream; stop driving the old source
                    return Ok(());
                };
                on_update(&segments);
            }
            Some(Err(e)) => {
                let reason = e.to_string();
                conversation.fail_request(&handle, &reason);
                return Err(Error::Stream(e));
            }
            None => break,
        }
    }

    conversation.complete_request(&handle, runner, history);
    Ok(())
}
