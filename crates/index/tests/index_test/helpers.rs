use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pitlane_core::{Chunk, DocumentMetadata};
use pitlane_ingest::{Embedder, EmbeddingError};

/// Maps a text to a vector derived from its bytes, 4-d unless built with
/// [`FakeEmbedder::with_dimensions`]. Texts containing "unembeddable" fail.
pub struct FakeEmbedder {
    pub model: String,
    pub dimensions: usize,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(model: &str) -> Self {
        Self::with_dimensions(model, 4)
    }

    pub fn with_dimensions(model: &str, dimensions: usize) -> Self {
        Self {
            model: model.to_string(),
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn vector_for(text: &str) -> Vec<f32> {
    vector_of_width(text, 4)
}

fn vector_of_width(text: &str, width: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; width];
    for (i, b) in text.bytes().enumerate() {
        v[i % width] += b as f32 / 255.0;
    }
    v
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("unembeddable") {
            return Err(EmbeddingError::Api("503 Service Unavailable".into()));
        }
        Ok(vector_of_width(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}

pub fn make_chunk(source: &str, text: &str) -> Chunk {
    Chunk {
        text: text.to_string(),
        metadata: DocumentMetadata {
            title: source.rsplit('/').next().unwrap_or(source).to_string(),
            source: source.to_string(),
            page_number: None,
        },
        char_offset: 0,
    }
}

pub fn corpus() -> Vec<Chunk> {
    vec![
        make_chunk("https://en.wikipedia.org/wiki/Max_Verstappen", "Verstappen won the 2021 title"),
        make_chunk("https://en.wikipedia.org/wiki/Lewis_Hamilton", "Hamilton finished second in 2021"),
        make_chunk("data/pdfs/sporting_regulations.pdf", "Points are awarded to the top ten"),
        make_chunk("data/pdfs/sporting_regulations.pdf", "unembeddable table of contents"),
    ]
}
