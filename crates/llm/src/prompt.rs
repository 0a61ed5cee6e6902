//! System prompts for answering and for question contextualisation.

use std::path::Path;

use thiserror::Error;

/// Placeholder in the answer template replaced by the retrieved passages.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Built-in answer prompt.
pub const DEFAULT_ANSWER_TEMPLATE: &str = "\
You are an assistant for question-answering tasks about Formula 1. \
Use the following pieces of retrieved context, taken from encyclopedia \
articles and FIA regulations, to answer the question. \
If the context does not contain the answer, say that you don't know \
and do not invent sources. Keep the answer concise.

{context}";

/// Instruction used to turn a follow-up into a standalone question.
pub const CONTEXTUALIZE_PROMPT: &str = "\
Given a chat history and the latest user question which might reference \
context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just \
reformulate it if needed and otherwise return it as is.";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read prompt template at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("prompt template must contain exactly one '{{context}}' placeholder, found {0}")]
    Placeholder(usize),
}

/// Answer prompt with a single context slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        let count = template.matches(CONTEXT_PLACEHOLDER).count();
        if count != 1 {
            return Err(PromptError::Placeholder(count));
        }
        Ok(Self { template })
    }

    /// Load a template from disk, failing eagerly on a bad placeholder count.
    pub fn from_file(path: &Path) -> Result<Self, PromptError> {
        let content = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(content)
    }

    /// The override file when configured, the built-in prompt otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, PromptError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Stuff `context` into the template's context slot.
    pub fn render(&self, context: &str) -> String {
        self.template.replacen(CONTEXT_PLACEHOLDER, context, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_ANSWER_TEMPLATE.to_string(),
        }
    }
}
