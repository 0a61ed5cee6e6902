use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PitlaneError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Split a comma separated list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_WIKI_SEARCHES: &str =
    "Formula One World Championship,List of Formula One World Drivers' Champions,Formula One drivers";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub corpus: CorpusConfig,
    pub chunking: ChunkingConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PITLANE_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PITLANE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            corpus: CorpusConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            index: IndexConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PitlaneError> {
        if self.chunking.chunk_size == 0 {
            return Err(PitlaneError::Config("CHUNK_SIZE must be greater than zero".into()));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(PitlaneError::Config(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunking.overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(PitlaneError::Config("TOP_K must be greater than zero".into()));
        }
        if self.embedding.dimensions == 0 {
            return Err(PitlaneError::Config(
                "EMBEDDING_DIMENSIONS must be greater than zero".into(),
            ));
        }
        if self.embedding.concurrency == 0 {
            return Err(PitlaneError::Config(
                "EMBEDDING_CONCURRENCY must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  llm:        url={}, model={}", self.llm.base_url, self.llm.model);
        tracing::info!("  embedding:  url={}, model={}, dims={}", self.embedding.base_url, self.embedding.model, self.embedding.dimensions);
        tracing::info!("  corpus:     searches={}, max_docs={}, pdf_dir={}", self.corpus.wiki_searches.len(), self.corpus.wiki_max_docs, self.corpus.pdf_dir.display());
        tracing::info!("  chunking:   size={}, overlap={}", self.chunking.chunk_size, self.chunking.overlap);
        tracing::info!("  index:      dir={}", self.index.dir.display());
        tracing::info!("  retrieval:  top_k={}", self.retrieval.top_k);
    }

    /// Return a redacted view safe to print (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "llm": {
                "base_url": self.llm.base_url,
                "model": self.llm.model,
                "configured": self.llm.is_configured(),
            },
            "embedding": {
                "base_url": self.embedding.base_url,
                "model": self.embedding.model,
                "dimensions": self.embedding.dimensions,
                "configured": self.embedding.is_configured(),
            },
            "corpus": {
                "wiki_searches": self.corpus.wiki_searches,
                "wiki_max_docs": self.corpus.wiki_max_docs,
                "pdf_dir": self.corpus.pdf_dir,
            },
            "chunking": { "chunk_size": self.chunking.chunk_size, "overlap": self.chunking.overlap },
            "index": { "dir": self.index.dir },
            "retrieval": { "top_k": self.retrieval.top_k },
        })
    }
}

// ── LLM (chat completions) ────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Optional file overriding the built-in answer prompt template.
    pub prompt_path: Option<PathBuf>,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            base_url: profiled_env_or(p, "CHATGPT_BASE_URL", DEFAULT_OPENAI_URL),
            model: profiled_env_or(p, "GENERATOR_MODEL", "gpt-4o-mini"),
            max_tokens: profiled_env_u64(p, "LLM_MAX_TOKENS", 1024) as u32,
            timeout_secs: profiled_env_u64(p, "LLM_TIMEOUT_SECS", 60),
            prompt_path: profiled_env_opt(p, "GENERATOR_PROMPT_PATH").map(PathBuf::from),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimensions: usize,
    pub timeout_secs: u64,
    /// Upper bound on in-flight embedding calls during an index build.
    pub concurrency: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            base_url: profiled_env_or(p, "EMBEDDINGS_BASE_URL", DEFAULT_OPENAI_URL),
            model: profiled_env_or(p, "EMBEDDINGS_MODEL", "text-embedding-3-small"),
            dimensions: profiled_env_usize(p, "EMBEDDING_DIMENSIONS", 1024),
            timeout_secs: profiled_env_u64(p, "EMBEDDING_TIMEOUT_SECS", 30),
            concurrency: profiled_env_usize(p, "EMBEDDING_CONCURRENCY", 8),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Corpus sources ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub wiki_searches: Vec<String>,
    /// Per search term cap on fetched articles.
    pub wiki_max_docs: usize,
    pub wiki_api_url: String,
    pub pdf_dir: PathBuf,
}

impl CorpusConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            wiki_searches: split_list(&profiled_env_or(p, "WIKI_SEARCHES", DEFAULT_WIKI_SEARCHES)),
            wiki_max_docs: profiled_env_usize(p, "WIKI_MAX_DOCS", 25),
            wiki_api_url: profiled_env_or(p, "WIKI_API_URL", "https://en.wikipedia.org/w/api.php"),
            pdf_dir: PathBuf::from(profiled_env_or(p, "PDF_DIR_PATH", "data/pdfs")),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows.
    pub overlap: usize,
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            chunk_size: profiled_env_usize(p, "CHUNK_SIZE", 1000),
            overlap: profiled_env_usize(p, "CHUNK_OVERLAP", 200),
        }
    }
}

// ── Index ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub dir: PathBuf,
}

impl IndexConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "INDEX_DIR_PATH", "data/index")),
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            top_k: profiled_env_usize(p, "TOP_K", 4),
        }
    }
}
