pub mod chunker;
pub mod loader;
pub mod pdf;
pub mod wikipedia;

use thiserror::Error;

/// A single ingestion source could not be read. Always absorbed by the loader.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: u32,
    /// The extracted text content.
    pub text: String,
}
