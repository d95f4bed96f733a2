//! Deterministic provider replaying a fixed fragment script.
//!
//! Used by tests and offline demos; also the reference implementation of
//! the provider contract. Prompts are accepted and ignored.

use crate::error::{ProviderError, StreamError};
use crate::provider::ModelProvider;
use crate::stream::FragmentStream;
use async_trait::async_trait;

/// Default fragment size used by [`ScriptedProvider::from_reply`].
const REPLY_FRAGMENT_BYTES: usize = 16;

/// One scripted stream item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFragment {
    /// A text fragment delivered successfully.
    Text(String),

    /// A transport failure terminating the stream.
    Fail(String),
}

/// Provider that replays a fixed fragment script on every request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    fragments: Vec<ScriptedFragment>,
}

impl ScriptedProvider {
    /// Creates a provider from an explicit fragment script.
    #[must_use]
    pub const fn new(fragments: Vec<ScriptedFragment>) -> Self {
        Self { fragments }
    }

    /// Creates a provider that streams `reply` in small fragments,
    /// exercising the incremental path the way a remote model would.
    #[must_use]
    pub fn from_reply(reply: &str) -> Self {
        let mut fragments = Vec::new();
        let mut chunk = String::new();
        for c in reply.chars() {
            chunk.push(c);
            if chunk.len() >= REPLY_FRAGMENT_BYTES {
                fragments.push(ScriptedFragment::Text(std::mem::take(&mut chunk)));
            }
        }
        if !chunk.is_empty() {
            fragments.push(ScriptedFragment::Text(chunk));
        }
        Self { fragments }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn stream_response(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> std::result::Result<FragmentStream, ProviderError> {
        let items: Vec<std::result::Result<String, StreamError>> = self
            .fragments
            .iter()
            .cloned()
            .map(|fragment| match fragment {
                ScriptedFragment::Text(text) => Ok(text),
                ScriptedFragment::Fail(reason) => Err(StreamError::Transport { reason }),
            })
            .collect();

        Ok(Box::pin(tokio_stream::iter(items)))
    }
}
