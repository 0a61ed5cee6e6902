//! Merges every configured source into one deterministic document list.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use pitlane_core::config::CorpusConfig;
use pitlane_core::Document;
use tracing::{info, warn};

use super::pdf;
use super::wikipedia::{ArticleSource, WikipediaClient};

pub struct DocumentLoader {
    articles: Arc<dyn ArticleSource>,
    max_docs_per_term: usize,
}

impl DocumentLoader {
    pub fn new(articles: Arc<dyn ArticleSource>, max_docs_per_term: usize) -> Self {
        Self {
            articles,
            max_docs_per_term,
        }
    }

    pub fn from_config(corpus: &CorpusConfig) -> Self {
        Self::new(
            Arc::new(WikipediaClient::new(corpus.wiki_api_url.clone())),
            corpus.wiki_max_docs,
        )
    }

    /// Load articles for each search term (in order), then every PDF page in
    /// `pdf_dir` (files in path order). A failing source is logged and skipped.
    ///
    /// Articles returned by more than one search term are kept once, at the
    /// position of their first appearance.
    pub async fn load_all(&self, search_terms: &[String], pdf_dir: &Path) -> Vec<Document> {
        let mut documents = Vec::new();
        let mut seen_articles = HashSet::new();

        for term in search_terms {
            match self.articles.fetch_articles(term, self.max_docs_per_term).await {
                Ok(articles) => {
                    let fetched = articles.len();
                    let mut added = 0usize;
                    for article in articles {
                        if seen_articles.insert(article.metadata.source.clone()) {
                            documents.push(article);
                            added += 1;
                        }
                    }
                    info!(term = %term, fetched, added, "loaded articles");
                }
                Err(e) => warn!(term = %term, error = %e, "article source unavailable, skipping"),
            }
        }

        let dir = pdf_dir.to_path_buf();
        match tokio::task::spawn_blocking(move || pdf::load_pdf_dir(&dir)).await {
            Ok(pages) => {
                info!(dir = %pdf_dir.display(), pages = pages.len(), "loaded PDF pages");
                documents.extend(pages);
            }
            Err(e) => warn!(dir = %pdf_dir.display(), error = %e, "PDF loading task failed, skipping"),
        }

        info!(documents = documents.len(), "corpus loaded");
        documents
    }
}
