//! PDF source: one document per non-blank page of every `.pdf` in a directory.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use pitlane_core::{Document, DocumentMetadata};
use tracing::{info, warn};

use super::{PageContent, SourceError};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, SourceError> {
    // pdf-extract panics on some malformed files; treat that as an unreadable PDF.
    let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| SourceError::Pdf("extractor panicked on malformed input".to_string()))?
        .map_err(|e| SourceError::Pdf(e.to_string()))?;

    Ok(split_pages(&text))
}

/// pdf-extract returns all text as one string with form feeds (`\x0C`)
/// between pages. Blank pages are dropped but keep their page number slot.
pub(crate) fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i as u32 + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}

/// List `.pdf` files directly inside `dir`, sorted by path.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load one PDF as page documents.
pub fn load_pdf(path: &Path) -> Result<Vec<Document>, SourceError> {
    let bytes = std::fs::read(path)?;
    let pages = extract_pdf(&bytes)?;

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let source = path.display().to_string();

    Ok(pages
        .into_iter()
        .map(|page| {
            Document::new(
                page.text,
                DocumentMetadata {
                    title: title.clone(),
                    source: source.clone(),
                    page_number: Some(page.page_number),
                },
            )
        })
        .collect())
}

/// Load every PDF in `dir`. Unreadable files are logged and skipped.
pub fn load_pdf_dir(dir: &Path) -> Vec<Document> {
    let files = match list_pdf_files(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "PDF directory unavailable, skipping");
            return Vec::new();
        }
    };

    let mut documents = Vec::new();
    for path in files {
        match load_pdf(&path) {
            Ok(pages) => {
                info!(file = %path.display(), pages = pages.len(), "loaded PDF");
                documents.extend(pages);
            }
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable PDF"),
        }
    }
    documents
}
