use std::sync::Arc;
use tracing::instrument;

use crate::domain::{ports::CompletionService, Turn};

const REWRITE_INSTRUCTION: &str = "Given a chat history and the latest user question, \
rephrase the question into a standalone question that can be understood without the \
chat history. Do NOT answer the question; only reformulate it, and return it \
unchanged if it already stands alone. Do not introduce facts that are not implied \
by the question or the history.";

/// Rewrites a follow-up question into a standalone one using the session
/// history, so retrieval does not depend on prior turns.
pub struct QueryContextualizer {
    completion: Arc<dyn CompletionService>,
}

impl QueryContextualizer {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// A first-turn question needs no rewriting. If the completion backend
    /// fails, the original question is used as-is: retrieval quality degrades
    /// but the call stays available.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn rewrite(&self, question: &str, history: &[Turn]) -> String {
        if history.is_empty() {
            return question.to_string();
        }

        match self
            .completion
            .complete(REWRITE_INSTRUCTION, history, question)
            .await
        {
            Ok(rewritten) => {
                let rewritten = rewritten.trim();
                if rewritten.is_empty() {
                    tracing::warn!("rewrite returned empty text, keeping original question");
                    question.to_string()
                } else {
                    rewritten.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "question rewrite failed, keeping original question");
                question.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PipelineError;
    use async_trait::async_trait;

    struct EchoCompletion;

    #[async_trait]
    impl CompletionService for EchoCompletion {
        async fn complete(
            &self,
            _system: &str,
            _history: &[Turn],
            user: &str,
        ) -> Result<String, PipelineError> {
            Ok(format!("standalone: {user}"))
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionService for FailingCompletion {
        async fn complete(
            &self,
            _system: &str,
            _history: &[Turn],
            _user: &str,
        ) -> Result<String, PipelineError> {
            Err(PipelineError::synthesis("backend down"))
        }
    }

    #[tokio::test]
    async fn empty_history_skips_the_model() {
        let contextualizer = QueryContextualizer::new(Arc::new(FailingCompletion));
        let out = contextualizer.rewrite("What is the capital?", &[]).await;
        assert_eq!(out, "What is the capital?");
    }

    #[tokio::test]
    async fn rewrites_with_history() {
        let contextualizer = QueryContextualizer::new(Arc::new(EchoCompletion));
        let history = vec![Turn::user("About France."), Turn::assistant("Sure.")];
        let out = contextualizer.rewrite("What about the tower?", &history).await;
        assert_eq!(out, "standalone: What about the tower?");
    }

    #[tokio::test]
    async fn falls_back_to_original_on_failure() {
        let contextualizer = QueryContextualizer::new(Arc::new(FailingCompletion));
        let history = vec![Turn::user("About France.")];
        let out = contextualizer.rewrite("What about the tower?", &history).await;
        assert_eq!(out, "What about the tower?");
    }
}
