//! OpenAI-compatible streaming provider.
//!
//! Maps streaming chat completion deltas onto the fragment contract. Any
//! endpoint speaking the OpenAI wire format works through the base URL
//! override.

use crate::error::{ProviderError, StreamError};
use crate::provider::ModelProvider;
use crate::stream::FragmentStream;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::debug;

/// Default model identifier for agent mode.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Streaming provider backed by an OpenAI-compatible API.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Creates a provider from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Arguments
    ///
    /// * `model` - Model identifier to request.
    /// * `api_base` - Optional base URL override for compatible endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingApiKey`] when no key is configured.
    pub fn from_env(
        model: impl Into<String>,
        api_base: Option<&str>,
    ) -> std::result::Result<Self, ProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Ok(Self {
            client: Client::with_config(config),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn stream_response(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<FragmentStream, ProviderError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?
                    .into(),
            ])
            .stream(true)
            .build()?;

        debug!(model = %self.model, "opening streaming chat completion");
        let stream = self.client.chat().create_stream(request).await?;

        let fragments = stream.map(|chunk| match chunk {
            Ok(chunk) => Ok(chunk
                .choices
                .into_iter()
                .filter_map(|choice| choice.delta.content)
                .collect::<String>()),
            Err(e) => Err(StreamError::Transport {
                reason: e.to_string(),
            }),
        });

        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        // Only meaningful when the variable is absent from the environment
        if std::env::var("OPENAI_API_KEY").is_err() {
            let result = OpenAiProvider::from_env(DEFAULT_MODEL, None);
            assert!(matches!(result, Err(ProviderError::MissingApiKey)));
        }
    }
}
