use clap::Parser;

/// Formula 1 question answering over Wikipedia articles and FIA PDFs.
///
/// Loads the persisted index (building it on first run), then answers
/// questions in an interactive session that keeps the conversation so
/// follow-ups can refer back to earlier turns.
#[derive(Parser, Debug)]
#[command(name = "pitlane", about = "Ask questions about Formula 1")]
pub struct CliArgs {
    /// Config profile; keys are read as {PROFILE}_{KEY} before {KEY}
    #[arg(long, env = "PITLANE_PROFILE")]
    pub profile: Option<String>,

    /// Ignore any persisted index and rebuild it from the sources
    #[arg(long)]
    pub rebuild: bool,

    /// Build or load the index, then exit
    #[arg(long)]
    pub build_only: bool,

    /// Answer a single question and exit instead of starting a session
    #[arg(long, short)]
    pub question: Option<String>,

    /// Number of passages retrieved per question (overrides TOP_K)
    #[arg(long)]
    pub top_k: Option<usize>,
}
