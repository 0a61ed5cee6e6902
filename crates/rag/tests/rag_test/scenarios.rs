use std::sync::atomic::Ordering;

use pitlane_core::ChatMessage;
use pitlane_llm::{Role, CONTEXT_PLACEHOLDER, GENERATION_FAILED};
use pitlane_rag::{format_sources, AnswerStatus};

use crate::helpers::{fixture, MONACO_URL, REGULATIONS_PDF, VERSTAPPEN_URL};

#[tokio::test]
async fn standalone_question_is_answered_with_cited_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = fixture(&tmp.path().join("index"), false).await;
    let question = "Who won the 2021 championship?";

    let answer = fx.pipeline.ask(&[], question).await;

    assert_eq!(answer.status, AnswerStatus::Answered);
    assert_eq!(answer.standalone_question, question);
    assert!(!answer.answer.is_empty());
    assert!(!answer.answer.contains(CONTEXT_PLACEHOLDER));

    let sources: Vec<&str> = answer
        .evidence
        .iter()
        .map(|r| r.chunk.metadata.source.as_str())
        .collect();
    assert_eq!(sources, vec![VERSTAPPEN_URL, REGULATIONS_PDF, REGULATIONS_PDF]);
    assert!(answer.evidence.windows(2).all(|w| w[0].score <= w[1].score));
    assert!(!sources.contains(&MONACO_URL));

    let citations = format_sources(&answer.evidence);
    assert_eq!(citations.lines().count(), 2);
    assert_eq!(citations, answer.sources());

    // No history: the only call is the answer itself.
    let requests = fx.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let system = &requests[0][0].content;
    assert!(system.contains("Max Verstappen won the 2021 championship in Abu Dhabi."));
    assert!(!system.contains(CONTEXT_PLACEHOLDER));
    let first = system.find("Abu Dhabi").unwrap();
    let second = system.find("most points").unwrap();
    assert!(first < second, "context keeps retrieval order");
}

#[tokio::test]
async fn follow_up_retrieves_with_reformulated_question() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = fixture(&tmp.path().join("index"), false).await;
    let conversation = vec![
        ChatMessage::user("Who won the 2021 championship?"),
        ChatMessage::assistant("Max Verstappen won the 2021 championship."),
    ];
    let snapshot = conversation.clone();

    let answer = fx.pipeline.ask(&conversation, "What did he win in 2021?").await;

    assert_eq!(answer.standalone_question, "What did Max Verstappen win in 2021?");
    assert_eq!(answer.evidence[0].chunk.metadata.source, VERSTAPPEN_URL);
    assert_eq!(conversation, snapshot);

    let requests = fx.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let answer_call = &requests[1];
    let roles: Vec<Role> = answer_call.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    // The original wording, not the rewrite, is the user turn.
    assert_eq!(answer_call[3].content, "What did he win in 2021?");
}

#[tokio::test]
async fn unreachable_embedding_service_yields_no_evidence() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = fixture(&tmp.path().join("index"), false).await;
    fx.embedder.unreachable.store(true, Ordering::SeqCst);

    let answer = fx.pipeline.ask(&[], "Who won the 2021 championship?").await;

    assert_eq!(answer.status, AnswerStatus::QueryNotProcessed);
    assert!(answer.evidence.is_empty());
    assert_eq!(format_sources(&answer.evidence), "");
    assert!(answer.answer.contains("don't know"));

    // Generation still ran, with an empty context and the fallback instruction.
    let requests = fx.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let system = &requests[0][0].content;
    assert!(system.contains("say that you don't know"));
    assert!(!system.contains(CONTEXT_PLACEHOLDER));
}

#[tokio::test]
async fn generation_failure_returns_fixed_text_and_keeps_evidence() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = fixture(&tmp.path().join("index"), true).await;

    let answer = fx.pipeline.ask(&[], "Who won the 2021 championship?").await;

    assert_eq!(answer.status, AnswerStatus::GenerationFailed);
    assert_eq!(answer.answer, GENERATION_FAILED);
    assert_eq!(answer.evidence.len(), 3);
}

#[tokio::test]
async fn top_k_bounds_evidence() {
    let tmp = tempfile::tempdir().unwrap();
    let fx = fixture(&tmp.path().join("index"), false).await;
    let pipeline = fx.pipeline.with_top_k(1);

    let answer = pipeline.ask(&[], "Who won the 2021 championship?").await;
    assert_eq!(answer.evidence.len(), 1);
    assert_eq!(answer.evidence[0].chunk.metadata.source, VERSTAPPEN_URL);
}
