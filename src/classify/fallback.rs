//! LLM-backed fallback classifiers.

use std::marker::PhantomData;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, error};

use super::error::ClassifyError;
use super::labels::LabelSet;

#[async_trait]
/// Secondary classifier; answers with a label only.
pub trait FallbackClassifier<L: LabelSet>: Send + Sync {
    async fn classify(&self, text: &str) -> Result<L, ClassifyError>;

    /// Returns `true` when answers are produced locally instead of by a provider.
    fn is_mock(&self) -> bool {
        false
    }
}

/// Asks a chat model to pick a label, then parses its free-text answer.
pub struct LlmClassifier<L> {
    client: Client,
    model: String,
    mock_provider: bool,
    _labels: PhantomData<fn() -> L>,
}

impl<L> std::fmt::Debug for LlmClassifier<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClassifier")
            .field("model", &self.model)
            .field("mock_provider", &self.mock_provider)
            .finish()
    }
}

impl<L: LabelSet> LlmClassifier<L> {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            mock_provider: false,
            _labels: PhantomData,
        }
    }

    /// Answers with the keyword heuristic and never contacts a provider.
    pub fn mock(model: impl Into<String>) -> Self {
        Self {
            mock_provider: true,
            ..Self::new(model)
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl<L: LabelSet> FallbackClassifier<L> for LlmClassifier<L> {
    async fn classify(&self, text: &str) -> Result<L, ClassifyError> {
        if self.mock_provider {
            return Ok(L::heuristic(text));
        }

        let request = ChatRequest::new(vec![ChatMessage::user(L::prompt(text))]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| {
                error!(kind = L::KIND, model = %self.model, "Provider error: {}", e);
                ClassifyError::Provider {
                    reason: e.to_string(),
                }
            })?;

        let answer = response
            .first_text()
            .map(str::trim)
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| ClassifyError::Provider {
                reason: "provider returned no text".to_string(),
            })?;

        debug!(kind = L::KIND, answer, "Fallback classifier answered");

        L::parse_llm(answer).ok_or_else(|| ClassifyError::UnrecognizedLabel {
            answer: answer.to_string(),
        })
    }

    fn is_mock(&self) -> bool {
        self.mock_provider
    }
}
