//! Retrieval-augmented conversation: retrieve, answer, cite.

pub mod citation;
pub mod pipeline;
pub mod retriever;

pub use citation::{format_sources, unique_sources};
pub use pipeline::{Answer, AnswerStatus, RagPipeline};
pub use retriever::{RetrievalError, Retriever};
