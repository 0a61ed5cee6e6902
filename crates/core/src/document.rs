use serde::{Deserialize, Serialize};

/// Provenance carried by every document and every chunk cut from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    /// Article URL or PDF file path.
    pub source: String,
    /// 1-based page number, PDF pages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

/// One web article or one PDF page of normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// True when the text carries nothing worth embedding.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A bounded window of a document's text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Character offset of the window start in the parent document.
    pub char_offset: usize,
}

/// A chunk returned by a nearest-neighbour query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub chunk: Chunk,
    /// Squared L2 distance to the query; lower is closer.
    pub score: f32,
}
