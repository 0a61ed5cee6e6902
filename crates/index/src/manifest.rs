use chrono::{DateTime, Utc};
use pitlane_core::Chunk;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// Descriptor written as `meta.json` next to the two index artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub index_id: Uuid,
    pub format_version: u32,
    pub dimensions: usize,
    pub count: usize,
    pub embedding_model: String,
    pub created_at: DateTime<Utc>,
    /// SHA-256 hex digest over chunk sources and texts, in index order.
    pub corpus_fingerprint: String,
    pub compression: String,
}

impl IndexManifest {
    pub fn new(dimensions: usize, chunks: &[Chunk], embedding_model: &str) -> Self {
        Self {
            index_id: Uuid::new_v4(),
            format_version: FORMAT_VERSION,
            dimensions,
            count: chunks.len(),
            embedding_model: embedding_model.to_string(),
            created_at: Utc::now(),
            corpus_fingerprint: corpus_fingerprint(chunks),
            compression: "zstd".to_string(),
        }
    }
}

pub fn corpus_fingerprint(chunks: &[Chunk]) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(chunk.metadata.source.as_bytes());
        hasher.update([0u8]);
        hasher.update(chunk.text.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use pitlane_core::DocumentMetadata;

    use super::*;

    fn chunk(source: &str, text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            metadata: DocumentMetadata {
                title: "t".into(),
                source: source.into(),
                page_number: None,
            },
            char_offset: 0,
        }
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let chunks = vec![chunk("a", "one"), chunk("b", "two")];
        assert_eq!(corpus_fingerprint(&chunks), corpus_fingerprint(&chunks));
        assert_eq!(corpus_fingerprint(&chunks).len(), 64);
    }

    #[test]
    fn fingerprint_separates_fields() {
        let a = vec![chunk("ab", "c")];
        let b = vec![chunk("a", "bc")];
        assert_ne!(corpus_fingerprint(&a), corpus_fingerprint(&b));
    }

    #[test]
    fn manifest_records_corpus() {
        let chunks = vec![chunk("a", "one")];
        let manifest = IndexManifest::new(4, &chunks, "fake");
        assert_eq!(manifest.count, 1);
        assert_eq!(manifest.format_version, FORMAT_VERSION);
        assert_eq!(manifest.corpus_fingerprint, corpus_fingerprint(&chunks));
        assert_ne!(manifest.corpus_fingerprint, corpus_fingerprint(&[chunk("a", "one!")]));
    }
}
