//! Model provider boundary.
//!
//! A provider is an opaque factory for fragment streams: the core hands it a
//! (system, user) prompt pair and receives incremental text back. Provider
//! framing never crosses this boundary, so the streaming pipeline works
//! identically against a remote model or a scripted replay.

pub mod scripted;

#[cfg(feature = "openai")]
pub mod openai;

use crate::error::ProviderError;
use crate::stream::FragmentStream;
use async_trait::async_trait;

pub use scripted::{ScriptedFragment, ScriptedProvider};

#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

/// A source of streamed model replies.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs and output.
    fn name(&self) -> &'static str;

    /// Opens a streaming response for the given prompts.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the request cannot be opened;
    /// failures after the stream starts arrive as stream items instead.
    async fn stream_response(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<FragmentStream, ProviderError>;
}
