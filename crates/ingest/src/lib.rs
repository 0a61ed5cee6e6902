//! Corpus ingestion: document loading, chunking and the embedding client.

pub mod document;
pub mod embedding;

pub use document::chunker::{split_document, split_documents, ChunkConfig, ChunkError};
pub use document::loader::DocumentLoader;
pub use document::wikipedia::{ArticleSource, WikipediaClient};
pub use document::SourceError;
pub use embedding::{Embedder, EmbeddingError, OpenAiEmbedder};
