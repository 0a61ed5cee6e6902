use std::collections::HashSet;

use pitlane_core::{DocumentMetadata, RetrievalResult};

/// Metadata of each distinct source in `evidence`, in first-seen order.
pub fn unique_sources(evidence: &[RetrievalResult]) -> Vec<&DocumentMetadata> {
    let mut seen = HashSet::new();
    evidence
        .iter()
        .map(|result| &result.chunk.metadata)
        .filter(|meta| seen.insert(meta.source.as_str()))
        .collect()
}

/// One `- title (source)` line per distinct source, or an empty string when
/// there is no evidence.
pub fn format_sources(evidence: &[RetrievalResult]) -> String {
    unique_sources(evidence)
        .into_iter()
        .map(|meta| format!("- {} ({})", meta.title, meta.source))
        .collect::<Vec<_>>()
        .join("\n")
}
