use pitlane_core::config::LlmConfig;
use pitlane_core::ChatMessage;
use tracing::{debug, error};

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

/// Answer text returned whenever generation fails.
pub const GENERATION_FAILED: &str = "Failed to generate an answer.";

/// Sampling temperature for every completion, answers and rewrites alike.
pub const TEMPERATURE: f32 = 0.7;

/// Chat-completion client with fixed sampling settings.
pub struct Generator {
    provider: Box<dyn LlmProvider>,
    max_tokens: u32,
}

impl Generator {
    pub fn new(provider: Box<dyn LlmProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(llm_config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = create_provider(llm_config)?;
        Ok(Self::new(provider, llm_config.max_tokens))
    }

    /// Send `system_prompt`, then the conversation, then `user_prompt`.
    pub async fn try_generate(
        &self,
        system_prompt: &str,
        conversation: &[ChatMessage],
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(conversation.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend(conversation.iter().map(Message::from));
        messages.push(Message::user(user_prompt));

        let response = self
            .provider
            .complete(messages, TEMPERATURE, self.max_tokens)
            .await?;
        if response.trim().is_empty() {
            return Err(LlmError::ParseError("empty completion".into()));
        }
        debug!(chars = response.len(), "generation complete");
        Ok(response)
    }

    /// Like [`Generator::try_generate`], but a failure is logged and turned
    /// into [`GENERATION_FAILED`]. Callers tell a failed turn apart by
    /// comparing against that constant.
    pub async fn generate(
        &self,
        system_prompt: &str,
        conversation: &[ChatMessage],
        user_prompt: &str,
    ) -> String {
        match self.try_generate(system_prompt, conversation, user_prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "error while generating answer");
                GENERATION_FAILED.to_string()
            }
        }
    }
}
