use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("service returned an empty embedding")]
    EmptyEmbedding,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Trait for embedding backends.
///
/// A failed call is an `Err`, never an empty vector: callers must decide
/// what a missing embedding means for them.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text into a vector of exactly `dimensions()` floats.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Model identifier, recorded alongside persisted indexes.
    fn model(&self) -> &str;
}
