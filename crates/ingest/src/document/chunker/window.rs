use pitlane_core::{Chunk, Document};

use super::types::ChunkConfig;

/// Chunk every document independently, preserving document order.
pub fn split_documents(documents: &[Document], config: &ChunkConfig) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| split_document(doc, config))
        .collect()
}

/// Cut `doc` into windows of `chunk_size` characters starting every
/// `chunk_size - overlap` characters. The last window may be shorter.
/// Blank documents yield no chunks.
pub fn split_document(doc: &Document, config: &ChunkConfig) -> Vec<Chunk> {
    if doc.is_blank() {
        return Vec::new();
    }

    let text = doc.text.as_str();
    // Byte offset of every char, so windows never split a code point.
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let len = boundaries.len();
    let byte_at = |char_pos: usize| boundaries.get(char_pos).copied().unwrap_or(text.len());

    let mut chunks = Vec::with_capacity(len / config.step() + 1);
    let mut start = 0usize;
    loop {
        let end = (start + config.chunk_size()).min(len);
        chunks.push(Chunk {
            text: text[byte_at(start)..byte_at(end)].to_string(),
            metadata: doc.metadata.clone(),
            char_offset: start,
        });
        if end == len {
            break;
        }
        start += config.step();
    }
    chunks
}
