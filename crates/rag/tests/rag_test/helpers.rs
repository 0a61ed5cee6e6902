use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pitlane_core::{Chunk, DocumentMetadata};
use pitlane_index::IndexHandle;
use pitlane_ingest::{Embedder, EmbeddingError};
use pitlane_llm::{Generator, LlmError, LlmProvider, Message, PromptTemplate};
use pitlane_rag::{RagPipeline, Retriever};

pub const VERSTAPPEN_URL: &str = "https://en.wikipedia.org/wiki/Max_Verstappen";
pub const MONACO_URL: &str = "https://en.wikipedia.org/wiki/Monaco_Grand_Prix";
pub const REGULATIONS_PDF: &str = "data/pdfs/2024_sporting_regulations.pdf";

const VOCABULARY: [&str; 6] = ["won", "2021", "championship", "points", "verstappen", "monaco"];

/// Bag-of-keywords embedder; can be switched into a failing state.
pub struct KeywordEmbedder {
    pub unreachable: AtomicBool,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            unreachable: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Api("connection refused".into()));
        }
        let lower = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
            .collect())
    }

    fn dimensions(&self) -> usize {
        VOCABULARY.len()
    }

    fn model(&self) -> &str {
        "keyword"
    }
}

/// Chat backend that resolves "he" to Max Verstappen when contextualising
/// and answers from whatever context it was given.
pub struct ScriptedProvider {
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
    pub fail_answers: bool,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.clone());
        let system = &messages[0].content;
        let question = &messages[messages.len() - 1].content;

        if system.contains("standalone question") {
            return Ok(question.replace(" he ", " Max Verstappen ").replace("he?", "Max Verstappen?"));
        }
        if self.fail_answers {
            return Err(LlmError::ApiError {
                status: 500,
                body: "internal error".into(),
            });
        }
        if system.contains("Verstappen won") {
            Ok("Max Verstappen won the 2021 championship.".into())
        } else {
            Ok("I don't know based on the available sources.".into())
        }
    }
}

pub fn make_chunk(title: &str, source: &str, page: Option<u32>, text: &str) -> Chunk {
    Chunk {
        text: text.to_string(),
        metadata: DocumentMetadata {
            title: title.to_string(),
            source: source.to_string(),
            page_number: page,
        },
        char_offset: 0,
    }
}

pub fn corpus() -> Vec<Chunk> {
    vec![
        make_chunk("Max Verstappen", VERSTAPPEN_URL, None, "Max Verstappen won the 2021 championship in Abu Dhabi."),
        make_chunk(
            "2024_sporting_regulations",
            REGULATIONS_PDF,
            Some(4),
            "Championship points are awarded to the first ten classified drivers.",
        ),
        make_chunk(
            "2024_sporting_regulations",
            REGULATIONS_PDF,
            Some(5),
            "The championship is won by the driver scoring the most points.",
        ),
        make_chunk("Monaco Grand Prix", MONACO_URL, None, "Monaco hosts a street race every May."),
    ]
}

pub struct Fixture {
    pub pipeline: RagPipeline,
    pub embedder: Arc<KeywordEmbedder>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

pub async fn fixture(dir: &Path, fail_answers: bool) -> Fixture {
    let embedder = Arc::new(KeywordEmbedder::new());
    let index = IndexHandle::open_or_build(dir, false, embedder.as_ref(), 2, || async { corpus() })
        .await
        .unwrap();

    let requests = Arc::new(Mutex::new(Vec::new()));
    let provider = ScriptedProvider {
        requests: requests.clone(),
        fail_answers,
    };
    let generator = Arc::new(Generator::new(Box::new(provider), 512));
    let retriever = Retriever::new(embedder.clone(), index);
    let pipeline = RagPipeline::new(generator, retriever, PromptTemplate::default(), 3);

    Fixture {
        pipeline,
        embedder,
        requests,
    }
}
