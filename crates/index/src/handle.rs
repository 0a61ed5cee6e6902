use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use pitlane_core::{Chunk, RetrievalResult};
use pitlane_ingest::Embedder;
use tracing::{info, warn};

use crate::build::build_index;
use crate::error::IndexError;
use crate::flat::VectorIndex;
use crate::manifest::IndexManifest;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Loaded,
    Built,
}

/// The read-only index a serving process works with.
///
/// The load-or-build decision happens once, in [`IndexHandle::open_or_build`];
/// clones share the same underlying index.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    index: Arc<VectorIndex>,
    manifest: Arc<IndexManifest>,
    origin: IndexOrigin,
}

impl IndexHandle {
    /// Load the index persisted at `dir`, or build and persist a new one.
    ///
    /// `ingest` produces the chunks to embed and is only awaited when a
    /// build happens. With `force_rebuild` any existing index is ignored and
    /// replaced. A corrupt existing index is an error, not a rebuild trigger,
    /// and so is a non-empty one whose vector width differs from what
    /// `embedder` produces.
    pub async fn open_or_build<F, Fut>(
        dir: &Path,
        force_rebuild: bool,
        embedder: &dyn Embedder,
        concurrency: usize,
        ingest: F,
    ) -> Result<Self, IndexError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Chunk>>,
    {
        if !force_rebuild && store::exists(dir) {
            let (index, manifest) = store::load(dir)?;
            if !index.is_empty() && index.dimensions() != embedder.dimensions() {
                return Err(IndexError::DimensionMismatch {
                    expected: index.dimensions(),
                    actual: embedder.dimensions(),
                });
            }
            if manifest.embedding_model != embedder.model() {
                warn!(
                    stored = %manifest.embedding_model,
                    configured = embedder.model(),
                    "index was built with a different embedding model"
                );
            }
            return Ok(Self::new(index, manifest, IndexOrigin::Loaded));
        }

        if force_rebuild {
            info!(dir = %dir.display(), "forced rebuild requested");
        } else {
            info!(dir = %dir.display(), "no persisted index, building");
        }

        let chunks = ingest().await;
        let index = build_index(chunks, embedder, concurrency).await?;
        let manifest = IndexManifest::new(index.dimensions(), index.chunks(), embedder.model());
        store::persist(&index, &manifest, dir)?;
        Ok(Self::new(index, manifest, IndexOrigin::Built))
    }

    pub fn new(index: VectorIndex, manifest: IndexManifest, origin: IndexOrigin) -> Self {
        Self {
            index: Arc::new(index),
            manifest: Arc::new(manifest),
            origin,
        }
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievalResult>, IndexError> {
        self.index.search(query, k)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn origin(&self) -> IndexOrigin {
        self.origin
    }
}
