use futures::stream::{self, StreamExt};
use pitlane_core::Chunk;
use pitlane_ingest::Embedder;
use tracing::{info, warn};

use crate::error::IndexError;
use crate::flat::VectorIndex;

/// Embed every chunk and collect the successful ones into an index.
///
/// Up to `concurrency` embedding calls are in flight at once. Results are
/// matched back to their chunk by position, so the stored order always
/// follows the input order. A chunk whose embedding fails is logged and
/// left out; it never leaves a hole in the index.
pub async fn build_index(
    chunks: Vec<Chunk>,
    embedder: &dyn Embedder,
    concurrency: usize,
) -> Result<VectorIndex, IndexError> {
    let total = chunks.len();
    info!(chunks = total, concurrency, model = embedder.model(), "embedding chunks");

    let mut embedded: Vec<(usize, Option<Vec<f32>>)> = stream::iter(chunks.iter().enumerate())
        .map(|(position, chunk)| async move {
            match embedder.embed(&chunk.text).await {
                Ok(vector) => (position, Some(vector)),
                Err(e) => {
                    warn!(
                        position,
                        source = %chunk.metadata.source,
                        error = %e,
                        "skipping chunk without embedding"
                    );
                    (position, None)
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    embedded.sort_unstable_by_key(|(position, _)| *position);

    let mut index = VectorIndex::new(embedder.dimensions());
    let mut skipped = 0usize;
    for ((_, vector), chunk) in embedded.into_iter().zip(chunks) {
        let Some(vector) = vector else {
            skipped += 1;
            continue;
        };
        match index.push(&vector, chunk) {
            Ok(()) => {}
            Err(e @ (IndexError::EmptyVector | IndexError::DimensionMismatch { .. })) => {
                warn!(error = %e, "skipping chunk with unusable embedding");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(stored = index.len(), skipped, total, "index built");
    Ok(index)
}
