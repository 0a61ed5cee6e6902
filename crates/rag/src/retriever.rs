use std::sync::Arc;

use pitlane_core::RetrievalResult;
use pitlane_index::{IndexError, IndexHandle};
use pitlane_ingest::{Embedder, EmbeddingError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("query could not be embedded: {0}")]
    QueryNotEmbedded(#[from] EmbeddingError),

    #[error("index search failed: {0}")]
    Index(#[from] IndexError),
}

/// Embeds a query and looks up its nearest chunks.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: IndexHandle,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: IndexHandle) -> Self {
        Self { embedder, index }
    }

    /// Up to `k` chunks, closest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievalResult>, RetrievalError> {
        let vector = self.embedder.embed(query).await?;
        let results = self.index.search(&vector, k)?;
        debug!(k, found = results.len(), "retrieved chunks");
        Ok(results)
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }
}
