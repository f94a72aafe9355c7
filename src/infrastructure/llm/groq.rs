use std::time::Duration;

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::groq;

use crate::domain::{ports::CompletionService, PipelineError, Turn};
use crate::infrastructure::config::LlmConfig;

/// Groq completion backend via rig. Reads `GROQ_API_KEY` from the
/// environment at call time.
pub struct GroqCompletion {
    model: String,
    timeout: Duration,
}

impl GroqCompletion {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.model, Duration::from_secs(config.timeout_seconds))
    }

    fn build_prompt(&self, message: &str, history: &[Turn]) -> String {
        if history.is_empty() {
            return message.to_string();
        }

        let context = history
            .iter()
            .map(|t| format!("{}: {}", t.role.as_str(), t.text))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Previous conversation:\n{}\n\nCurrent message from user: {}",
            context, message
        )
    }
}

#[async_trait]
impl CompletionService for GroqCompletion {
    async fn complete(
        &self,
        system: &str,
        history: &[Turn],
        user: &str,
    ) -> Result<String, PipelineError> {
        let client = groq::Client::from_env();
        let agent = client.agent(&self.model).preamble(system).build();
        let prompt = self.build_prompt(user, history);

        tokio::time::timeout(self.timeout, agent.prompt(&prompt))
            .await
            .map_err(|_| PipelineError::synthesis("completion request timed out"))?
            .map_err(|e| PipelineError::synthesis(e.to_string()))
    }
}
