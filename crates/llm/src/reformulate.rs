use std::sync::Arc;

use pitlane_core::ChatMessage;
use tracing::{debug, warn};

use crate::generator::Generator;
use crate::prompt::CONTEXTUALIZE_PROMPT;

/// Rewrites follow-up questions into standalone ones using the history.
pub struct QueryReformulator {
    generator: Arc<Generator>,
    instruction: String,
}

impl QueryReformulator {
    pub fn new(generator: Arc<Generator>) -> Self {
        Self {
            generator,
            instruction: CONTEXTUALIZE_PROMPT.to_string(),
        }
    }

    /// Standalone version of `question`.
    ///
    /// Without history the question is returned as is and no call is made.
    /// The model output is advisory text: a failed or blank rewrite falls
    /// back to the original question.
    pub async fn reformulate(&self, conversation: &[ChatMessage], question: &str) -> String {
        if conversation.is_empty() {
            return question.to_string();
        }

        match self
            .generator
            .try_generate(&self.instruction, conversation, question)
            .await
        {
            Ok(rewritten) => {
                let rewritten = rewritten.trim();
                debug!(original = %question, standalone = %rewritten, "question reformulated");
                rewritten.to_string()
            }
            Err(e) => {
                warn!(error = %e, "reformulation failed, using the original question");
                question.to_string()
            }
        }
    }
}
