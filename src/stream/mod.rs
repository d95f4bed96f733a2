//! Token stream adaptation for in-flight agent requests.
//!
//! Wraps an asynchronous source of incremental text fragments into a single
//! append-only response buffer. Each fragment is an opaque append: the
//! adapter never parses provider framing, and fragments are applied strictly
//! in arrival order. After every increment the reasoning/answer segments are
//! re-derived from the full buffer, never patched, so a separator split
//! across increments resolves once both are present.

use crate::core::{ANSWER_SEPARATOR, Segments};
use crate::error::StreamError;
use crate::parse::splitter;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;

/// Boxed stream of text fragments from a model provider.
///
/// Terminates normally at stream end or abnormally with a single
/// [`StreamError::Transport`] item.
pub type FragmentStream =
    Pin<Box<dyn Stream<Item = std::result::Result<String, StreamError>> + Send>>;

/// One applied increment: the fragment that arrived and the segments
/// re-derived from the full buffer afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Increment {
    /// The raw fragment appended by this increment.
    pub fragment: String,

    /// Segments derived from the full buffer including this fragment.
    pub segments: Segments,
}

/// Adapts a fragment stream into a growing response buffer.
pub struct TokenStreamAdapter {
    source: FragmentStream,
    buffer: String,
}

impl std::fmt::Debug for TokenStreamAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStreamAdapter")
            .field("buffer_len", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl TokenStreamAdapter {
    /// Wraps a fragment source with an empty buffer.
    #[must_use]
    pub fn new(source: FragmentStream) -> Self {
        Self {
            source,
            buffer: String::new(),
        }
    }

    /// Awaits the next fragment, appends it, and returns the applied
    /// increment with freshly re-derived segments.
    ///
    /// Returns `None` once the source is exhausted. A transport failure is
    /// surfaced once and the buffer is left as received so far.
    pub async fn next_increment(&mut self) -> Option<std::result::Result<Increment, StreamError>> {
        match self.source.next().await? {
            Ok(fragment) => {
                self.buffer.push_str(&fragment);
                Some(Ok(Increment {
                    segments: self.segments(),
                    fragment,
                }))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Returns the full buffer received so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Derives segments from the current buffer.
    #[must_use]
    pub fn segments(&self) -> Segments {
        splitter::derive(&self.buffer, ANSWER_SEPARATOR)
    }

    /// Consumes the adapter, yielding the final buffer.
    #[must_use]
    pub fn into_buffer(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(fragments: Vec<std::result::Result<String, StreamError>>) -> FragmentStream {
        Box::pin(tokio_stream::iter(fragments))
    }

    #[tokio::test]
    async fn test_fragments_append_in_order() {
        let mut adapter = scripted_adapter(&["Hello, ", "world"]);

        let first = adapter.next_increment().await;
        assert!(first.is_some_and(|r| r.is_ok()));
        assert_eq!(adapter.buffer(), "Hello, ");

        let second = adapter.next_increment().await;
        assert!(second.is_some_and(|r| r.is_ok()));
        assert_eq!(adapter.buffer(), "Hello, world");

        assert!(adapter.next_increment().await.is_none());
    }

    #[tokio::test]
    async fn test_separator_split_across_increments() {
        let mut adapter = scripted_adapter(&["Step 1: compute deriv===EQ", "UALS===Result is 4"]);

        let increment = adapter.next_increment().await.and_then(Result::ok);
        assert!(increment.as_ref().is_some_and(|i| {
            i.segments.reasoning == "Step 1: compute deriv===EQ" && i.segments.answer.is_empty()
        }));

        let increment = adapter.next_increment().await.and_then(Result::ok);
        assert!(increment.as_ref().is_some_and(|i| {
            i.fragment == "UALS===Result is 4"
                && i.segments.reasoning == "Step 1: compute deriv"
                && i.segments.answer == "Result is 4"
        }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let mut adapter = TokenStreamAdapter::new(scripted(vec![
            Ok("partial".to_string()),
            Err(StreamError::Transport {
                reason: "connection reset".to_string(),
            }),
        ]));

        let first = adapter.next_increment().await;
        assert!(first.is_some_and(|r| r.is_ok()));

        let second = adapter.next_increment().await;
        assert!(second.is_some_and(|r| r.is_err()));

        // The buffer keeps what arrived before the failure
        assert_eq!(adapter.buffer(), "partial");
    }

    fn scripted_adapter(fragments: &[&str]) -> TokenStreamAdapter {
        let items: Vec<std::result::Result<String, StreamError>> =
            fragments.iter().map(|f| Ok((*f).to_string())).collect();
        TokenStreamAdapter::new(scripted(items))
    }
}
