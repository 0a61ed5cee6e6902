mod cli;
mod corpus;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pitlane_core::config::{load_dotenv, Config};
use pitlane_core::ChatMessage;
use pitlane_index::{IndexHandle, IndexOrigin};
use pitlane_ingest::{ChunkConfig, DocumentLoader, Embedder, OpenAiEmbedder};
use pitlane_llm::{Generator, PromptTemplate};
use pitlane_rag::{RagPipeline, Retriever};

use crate::cli::CliArgs;
use crate::terminal::{Input, Terminal};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,pitlane=info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal;

    let mut config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::from_config(&config.embedding));
    if !config.embedding.is_configured() {
        warn!("no embedding API key configured, requests are sent unauthenticated");
    }

    let chunking = ChunkConfig::from_config(&config.chunking).context("invalid chunking settings")?;
    let loader = DocumentLoader::from_config(&config.corpus);
    let index = IndexHandle::open_or_build(
        &config.index.dir,
        args.rebuild,
        embedder.as_ref(),
        config.embedding.concurrency,
        || corpus::ingest(&loader, &config.corpus, &chunking),
    )
    .await
    .with_context(|| format!("failed to open index at {}", config.index.dir.display()))?;

    let origin = match index.origin() {
        IndexOrigin::Loaded => "loaded",
        IndexOrigin::Built => "built",
    };
    info!(
        entries = index.len(),
        model = %index.manifest().embedding_model,
        fingerprint = %index.manifest().corpus_fingerprint,
        "index {origin}"
    );

    if args.build_only {
        terminal.print_info(&format!(
            "Index {} at {} ({} passages)",
            origin,
            config.index.dir.display(),
            index.len()
        ))?;
        return Ok(());
    }

    if !config.llm.is_configured() {
        warn!("no LLM API key configured, requests are sent unauthenticated");
    }
    let generator = Arc::new(Generator::from_config(&config.llm).context("failed to create LLM provider")?);
    let prompt = PromptTemplate::load(config.llm.prompt_path.as_deref())
        .context("failed to load answer prompt")?;
    let retriever = Retriever::new(embedder, index.clone());
    let pipeline = RagPipeline::new(generator, retriever, prompt, config.retrieval.top_k);

    if let Some(question) = args.question {
        let answer = pipeline.ask(&[], &question).await;
        terminal.print_answer(&answer)?;
        return Ok(());
    }

    if index.is_empty() {
        terminal.print_error("the index is empty, answers will not be grounded in any source")?;
    }
    terminal.print_banner(config.profile_label(), &config.llm.model, index.len())?;

    // The session owns the conversation; the pipeline only borrows it.
    let mut conversation: Vec<ChatMessage> = Vec::new();
    loop {
        let question = match terminal.read_input()? {
            None | Some(Input::Exit) => {
                terminal.print_info("Goodbye.")?;
                break;
            }
            Some(Input::Empty) => continue,
            Some(Input::Question(question)) => question,
        };

        let answer = pipeline.ask(&conversation, &question).await;
        terminal.print_answer(&answer)?;

        conversation.push(ChatMessage::user(question));
        conversation.push(ChatMessage::assistant(answer.answer));
    }

    Ok(())
}
