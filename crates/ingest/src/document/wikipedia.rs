//! Encyclopedia source backed by the MediaWiki action API.

use std::time::Duration;

use async_trait::async_trait;
use pitlane_core::{Document, DocumentMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::SourceError;

/// Anything that turns a search term into article documents.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch up to `max_docs` articles matching `query`, best match first.
    async fn fetch_articles(&self, query: &str, max_docs: usize)
        -> Result<Vec<Document>, SourceError>;
}

/// Search + plain-text extract client for Wikipedia.
pub struct WikipediaClient {
    client: Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(api_url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("pitlane/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
        }
    }

    async fn search_titles(&self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("{status}: {body}")));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.query.search.into_iter().map(|hit| hit.title).collect())
    }

    async fn fetch_page(&self, title: &str) -> Result<Option<Document>, SourceError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("{status}: {body}")));
        }

        let parsed: PageResponse = response.json().await?;
        let page = match parsed.query.pages.into_iter().next() {
            Some(page) if !page.missing => page,
            _ => return Ok(None),
        };

        let text = page.extract.unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(Document::new(
            text,
            DocumentMetadata {
                source: page.fullurl.unwrap_or_else(|| wiki_url(&self.api_url, &page.title)),
                title: page.title,
                page_number: None,
            },
        )))
    }
}

#[async_trait]
impl ArticleSource for WikipediaClient {
    async fn fetch_articles(
        &self,
        query: &str,
        max_docs: usize,
    ) -> Result<Vec<Document>, SourceError> {
        if max_docs == 0 {
            return Ok(Vec::new());
        }
        let titles = self.search_titles(query, max_docs).await?;
        debug!(query, hits = titles.len(), "wikipedia search");

        let mut documents = Vec::with_capacity(titles.len());
        for title in titles.iter().take(max_docs) {
            match self.fetch_page(title).await {
                Ok(Some(doc)) => documents.push(doc),
                Ok(None) => debug!(title = %title, "article has no text, skipping"),
                Err(e) => warn!(title = %title, error = %e, "failed to fetch article, skipping"),
            }
        }
        Ok(documents)
    }
}

/// Fallback article URL when the API omits `fullurl`.
fn wiki_url(api_url: &str, title: &str) -> String {
    let base = api_url.trim_end_matches("/w/api.php");
    format!("{}/wiki/{}", base, title.replace(' ', "_"))
}

#[derive(Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageResponse {
    query: PageQuery,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    fullurl: Option<String>,
}
