use std::sync::Arc;
use tracing::instrument;

use crate::application::services::{QueryContextualizer, RetrievalService, SessionMemory};
use crate::domain::{ports::CompletionService, Answer, PipelineError, Turn};

const ANSWER_INSTRUCTION: &str = "You are a helpful assistant. Answer the user's question \
based on the provided context only. If you cannot find the answer in the context, state \
that you don't know instead of guessing.";

/// Separator between chunk texts in the grounding context.
const CONTEXT_DELIMITER: &str = "\n\n";

/// The per-turn question answering flow: history → standalone rewrite →
/// retrieval → grounded synthesis → session update.
pub struct ChatPipeline {
    sessions: Arc<SessionMemory>,
    contextualizer: QueryContextualizer,
    retriever: Arc<RetrievalService>,
    completion: Arc<dyn CompletionService>,
    top_k: usize,
}

impl ChatPipeline {
    pub fn new(
        sessions: Arc<SessionMemory>,
        contextualizer: QueryContextualizer,
        retriever: Arc<RetrievalService>,
        completion: Arc<dyn CompletionService>,
        top_k: usize,
    ) -> Self {
        Self {
            sessions,
            contextualizer,
            retriever,
            completion,
            top_k,
        }
    }

    /// Answers `question` within the given session.
    ///
    /// The session lock is held for the whole call, so concurrent questions
    /// on one session id serialize instead of interleaving history. The
    /// rewritten question drives retrieval only; the synthesizer sees the
    /// original. Session memory is mutated last, only on success.
    #[instrument(skip(self, question))]
    pub async fn ask(&self, session_id: &str, question: &str) -> Result<Answer, PipelineError> {
        let session = self.sessions.get_or_create(session_id)?;
        let mut session = session.lock().await;
        let history = session.history();

        let standalone = self.contextualizer.rewrite(question, &history).await;
        tracing::debug!(%standalone, "retrieval query");

        let results = self.retriever.retrieve_top_k(&standalone, self.top_k).await?;
        if results.is_empty() {
            tracing::warn!(session_id, "retrieval returned no chunks");
        }

        let context = results
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);
        let used_chunks = results.iter().map(|r| r.chunk.id).collect();

        let system = format!("{ANSWER_INSTRUCTION}\n\nContext:\n{context}");
        let answer_text = self.completion.complete(&system, &history, question).await?;

        session.push(Turn::user(question));
        session.push(Turn::assistant(&answer_text));

        Ok(Answer::new(answer_text, used_chunks))
    }

    /// History snapshot for UIs; oldest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Turn>, PipelineError> {
        self.sessions.history(session_id).await
    }
}
