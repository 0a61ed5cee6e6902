//! Conversation orchestrator: reformulate, retrieve, generate.
//!
//! The conversation is borrowed for the duration of one [`RagPipeline::ask`]
//! and never stored or modified; appending the new turns is up to the caller.

use std::sync::Arc;

use pitlane_core::{ChatMessage, RetrievalResult};
use pitlane_llm::{Generator, PromptTemplate, QueryReformulator, GENERATION_FAILED};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::citation::format_sources;
use crate::retriever::{RetrievalError, Retriever};

/// Separator placed between stuffed chunk texts.
const CONTEXT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// Generated from at least one retrieved chunk.
    Answered,
    /// Generated, but retrieval found nothing.
    NoContext,
    /// The question could not be embedded or searched.
    QueryNotProcessed,
    /// The generation call failed; the answer is the fixed failure text.
    GenerationFailed,
}

/// Result of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    /// Retrieved chunks, closest first.
    pub evidence: Vec<RetrievalResult>,
    /// The question actually used for retrieval.
    pub standalone_question: String,
    pub status: AnswerStatus,
}

impl Answer {
    /// Deduplicated source list for display.
    pub fn sources(&self) -> String {
        format_sources(&self.evidence)
    }
}

pub struct RagPipeline {
    reformulator: QueryReformulator,
    retriever: Retriever,
    generator: Arc<Generator>,
    prompt: PromptTemplate,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        generator: Arc<Generator>,
        retriever: Retriever,
        prompt: PromptTemplate,
        top_k: usize,
    ) -> Self {
        Self {
            reformulator: QueryReformulator::new(generator.clone()),
            retriever,
            generator,
            prompt,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer `question` given the prior `conversation`.
    ///
    /// Never fails: retrieval problems leave the context empty and
    /// generation problems yield [`GENERATION_FAILED`], both reflected in
    /// [`Answer::status`].
    pub async fn ask(&self, conversation: &[ChatMessage], question: &str) -> Answer {
        let standalone_question = self.reformulator.reformulate(conversation, question).await;

        let (evidence, mut status) = match self.retriever.retrieve(&standalone_question, self.top_k).await {
            Ok(evidence) if evidence.is_empty() => (evidence, AnswerStatus::NoContext),
            Ok(evidence) => (evidence, AnswerStatus::Answered),
            Err(e @ RetrievalError::QueryNotEmbedded(_)) => {
                warn!(error = %e, "could not process query, answering without context");
                (Vec::new(), AnswerStatus::QueryNotProcessed)
            }
            Err(e) => {
                error!(error = %e, "retrieval failed, answering without context");
                (Vec::new(), AnswerStatus::QueryNotProcessed)
            }
        };

        let context = evidence
            .iter()
            .map(|result| result.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let system_prompt = self.prompt.render(&context);

        let answer = self.generator.generate(&system_prompt, conversation, question).await;
        if answer == GENERATION_FAILED {
            status = AnswerStatus::GenerationFailed;
        }

        info!(
            history = conversation.len(),
            evidence = evidence.len(),
            status = ?status,
            "question answered"
        );

        Answer {
            answer,
            evidence,
            standalone_question,
            status,
        }
    }
}
