use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use pitlane_index::store::{self, CHUNKS_FILE};
use pitlane_index::{IndexError, IndexHandle, IndexOrigin};

use crate::helpers::{corpus, make_chunk, vector_for, FakeEmbedder};

#[tokio::test]
async fn builds_once_then_loads_without_ingesting() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("index");
    let embedder = FakeEmbedder::new("fake-embed");
    let ingested = AtomicUsize::new(0);

    let built = IndexHandle::open_or_build(&dir, false, &embedder, 2, || async {
        ingested.fetch_add(1, Ordering::SeqCst);
        corpus()
    })
    .await
    .unwrap();
    assert_eq!(built.origin(), IndexOrigin::Built);
    // The unembeddable chunk is skipped, never stored as a hole.
    assert_eq!(built.len(), corpus().len() - 1);
    assert_eq!(built.manifest().embedding_model, "fake-embed");

    let loaded = IndexHandle::open_or_build(&dir, false, &embedder, 2, || async {
        ingested.fetch_add(1, Ordering::SeqCst);
        corpus()
    })
    .await
    .unwrap();
    assert_eq!(loaded.origin(), IndexOrigin::Loaded);
    assert_eq!(ingested.load(Ordering::SeqCst), 1);
    assert_eq!(loaded.manifest(), built.manifest());

    let query = vector_for("Verstappen won the 2021 title");
    let before = built.search(&query, 3).unwrap();
    let after = loaded.search(&query, 3).unwrap();
    assert_eq!(before, after);
    assert_eq!(after[0].chunk.metadata.source, "https://en.wikipedia.org/wiki/Max_Verstappen");
    assert_eq!(after[0].score, 0.0);
}

#[tokio::test]
async fn force_rebuild_reingests_and_replaces() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("index");
    let embedder = FakeEmbedder::new("fake-embed");

    let first = IndexHandle::open_or_build(&dir, false, &embedder, 4, || async { corpus() })
        .await
        .unwrap();
    let calls_after_first = embedder.calls();

    let rebuilt = IndexHandle::open_or_build(&dir, true, &embedder, 4, || async {
        vec![make_chunk("data/pdfs/technical.pdf", "Plank wear is limited")]
    })
    .await
    .unwrap();
    assert_eq!(rebuilt.origin(), IndexOrigin::Built);
    assert_eq!(rebuilt.len(), 1);
    assert_ne!(rebuilt.manifest().corpus_fingerprint, first.manifest().corpus_fingerprint);
    assert_eq!(embedder.calls(), calls_after_first + 1);

    let (reloaded, _) = store::load(&dir).unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[tokio::test]
async fn corrupt_index_is_reported_not_rebuilt() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("index");
    let embedder = FakeEmbedder::new("fake-embed");

    IndexHandle::open_or_build(&dir, false, &embedder, 4, || async { corpus() })
        .await
        .unwrap();
    fs::remove_file(dir.join(CHUNKS_FILE)).unwrap();

    let ingested = AtomicUsize::new(0);
    let err = IndexHandle::open_or_build(&dir, false, &embedder, 4, || async {
        ingested.fetch_add(1, Ordering::SeqCst);
        corpus()
    })
    .await
    .unwrap_err();
    assert!(matches!(err, IndexError::Corrupt(_)));
    assert_eq!(ingested.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wider_embedder_refuses_existing_index() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("index");

    IndexHandle::open_or_build(&dir, false, &FakeEmbedder::new("fake-embed"), 4, || async { corpus() })
        .await
        .unwrap();

    let wider = FakeEmbedder::with_dimensions("fake-embed-large", 6);
    let ingested = AtomicUsize::new(0);
    let err = IndexHandle::open_or_build(&dir, false, &wider, 4, || async {
        ingested.fetch_add(1, Ordering::SeqCst);
        corpus()
    })
    .await
    .unwrap_err();
    assert!(matches!(err, IndexError::DimensionMismatch { expected: 4, actual: 6 }));
    assert_eq!(ingested.load(Ordering::SeqCst), 0);
    assert_eq!(wider.calls(), 0);

    // The stored index is left alone and a forced rebuild adopts the new width.
    assert_eq!(store::load(&dir).unwrap().1.dimensions, 4);
    let rebuilt = IndexHandle::open_or_build(&dir, true, &wider, 4, || async { corpus() })
        .await
        .unwrap();
    assert_eq!(rebuilt.manifest().dimensions, 6);
}

#[tokio::test]
async fn empty_corpus_gives_searchable_empty_index() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("index");
    let embedder = FakeEmbedder::new("fake-embed");

    let handle = IndexHandle::open_or_build(&dir, false, &embedder, 4, || async { Vec::new() })
        .await
        .unwrap();
    assert!(handle.is_empty());
    assert!(handle.search(&[0.0; 4], 4).unwrap().is_empty());
    assert!(store::exists(&dir));
}
