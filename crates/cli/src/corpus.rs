use pitlane_core::config::CorpusConfig;
use pitlane_core::Chunk;
use pitlane_ingest::{split_documents, ChunkConfig, DocumentLoader};
use tracing::info;

/// Load every configured source and cut it into chunks.
pub async fn ingest(loader: &DocumentLoader, corpus: &CorpusConfig, chunking: &ChunkConfig) -> Vec<Chunk> {
    let documents = loader.load_all(&corpus.wiki_searches, &corpus.pdf_dir).await;
    let chunks = split_documents(&documents, chunking);
    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        chunk_size = chunking.chunk_size(),
        overlap = chunking.overlap(),
        "corpus ingested"
    );
    chunks
}
