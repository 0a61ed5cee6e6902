pub mod generator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod reformulate;

pub use generator::{Generator, GENERATION_FAILED, TEMPERATURE};
pub use prompt::{PromptError, PromptTemplate, CONTEXT_PLACEHOLDER};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use reformulate::QueryReformulator;
