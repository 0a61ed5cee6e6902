pub mod openai;

use std::time::Duration;

use pitlane_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat-completion provider described by config.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    if llm_config.base_url.trim().is_empty() {
        return Err(LlmError::NotConfigured("CHATGPT_BASE_URL is empty".into()));
    }
    Ok(Box::new(openai::OpenAiProvider::new(
        llm_config.api_key.clone(),
        llm_config.model.clone(),
        llm_config.base_url.clone(),
        Duration::from_secs(llm_config.timeout_secs),
    )))
}
