use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, check_unit_interval, parse_from_env};
use crate::constants::{DEFAULT_LLM_RETRIES, DEFAULT_LLM_TIMEOUT_MS};

use super::error::ClassifyError;
use super::fallback::FallbackClassifier;
use super::labels::LabelSet;
use super::primary::PrimaryClassifier;
use super::types::{ClassificationResult, Prediction};

/// When and how the fallback tier is consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationPolicy {
    /// Escalate when primary confidence is below this. `None` escalates only on request.
    pub confidence_threshold: Option<f32>,
    /// Per-attempt bound on a fallback call.
    pub timeout: Duration,
    /// Extra attempts after a transient fallback failure.
    pub retries: u32,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: None,
            timeout: Duration::from_millis(DEFAULT_LLM_TIMEOUT_MS),
            retries: DEFAULT_LLM_RETRIES,
        }
    }
}

impl EscalationPolicy {
    pub const ENV_CONFIDENCE_THRESHOLD: &'static str = "SIERRA_CONFIDENCE_THRESHOLD";
    pub const ENV_LLM_TIMEOUT_MS: &'static str = "SIERRA_LLM_TIMEOUT_MS";
    pub const ENV_LLM_RETRIES: &'static str = "SIERRA_LLM_RETRIES";

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let confidence_threshold = parse_from_env::<f32>(Self::ENV_CONFIDENCE_THRESHOLD)?
            .map(|value| check_unit_interval(Self::ENV_CONFIDENCE_THRESHOLD, value))
            .transpose()?;

        let timeout = match parse_from_env::<u64>(Self::ENV_LLM_TIMEOUT_MS)? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    name: Self::ENV_LLM_TIMEOUT_MS,
                    value: "0".to_string(),
                    reason: "timeout must be positive".to_string(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.timeout,
        };

        let retries = parse_from_env::<u32>(Self::ENV_LLM_RETRIES)?.unwrap_or(defaults.retries);

        Ok(Self {
            confidence_threshold,
            timeout,
            retries,
        })
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn should_escalate(&self, confidence: f32) -> bool {
        self.confidence_threshold
            .is_some_and(|threshold| confidence < threshold)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Two-tier classifier: trained model first, LLM when asked or when unsure.
///
/// Never fails. Fallback errors are logged and answered with the primary result,
/// or with [`ClassificationResult::degraded`] when there is none.
pub struct ClassificationOrchestrator<L: LabelSet> {
    primary: Arc<dyn PrimaryClassifier<L>>,
    fallback: Arc<dyn FallbackClassifier<L>>,
    policy: EscalationPolicy,
}

impl<L: LabelSet> Clone for ClassificationOrchestrator<L> {
    fn clone(&self) -> Self {
        Self {
            primary: Arc::clone(&self.primary),
            fallback: Arc::clone(&self.fallback),
            policy: self.policy,
        }
    }
}

impl<L: LabelSet> std::fmt::Debug for ClassificationOrchestrator<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationOrchestrator")
            .field("kind", &L::KIND)
            .field("primary_stub", &self.primary.is_stub())
            .field("fallback_mock", &self.fallback.is_mock())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<L: LabelSet> ClassificationOrchestrator<L> {
    pub fn new(
        primary: Arc<dyn PrimaryClassifier<L>>,
        fallback: Arc<dyn FallbackClassifier<L>>,
        policy: EscalationPolicy,
    ) -> Self {
        info!(
            kind = L::KIND,
            primary_stub = primary.is_stub(),
            fallback_mock = fallback.is_mock(),
            confidence_threshold = ?policy.confidence_threshold,
            timeout_ms = policy.timeout_ms(),
            retries = policy.retries,
            "Classification orchestrator ready"
        );

        Self {
            primary,
            fallback,
            policy,
        }
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    pub fn primary_is_stub(&self) -> bool {
        self.primary.is_stub()
    }

    pub fn fallback_is_mock(&self) -> bool {
        self.fallback.is_mock()
    }

    /// Classifies `text`, escalating when `force_fallback` is set, the primary
    /// classifier fails, or its confidence is under the policy threshold.
    pub async fn classify(&self, text: &str, force_fallback: bool) -> ClassificationResult<L> {
        let primary = match self.run_primary(text).await {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                warn!(kind = L::KIND, error = %e, "Primary classifier failed");
                None
            }
        };

        let escalate = force_fallback
            || primary.is_none_or(|p| self.policy.should_escalate(p.confidence));

        if !escalate && let Some(prediction) = primary {
            return ClassificationResult::primary(prediction);
        }

        debug!(
            kind = L::KIND,
            force_fallback,
            primary_confidence = ?primary.map(|p| p.confidence),
            "Escalating to fallback classifier"
        );

        match self.run_fallback(text).await {
            Ok(label) => ClassificationResult::fallback(label),
            Err(e) => {
                warn!(kind = L::KIND, error = %e, "Fallback classifier failed");
                match primary {
                    Some(prediction) => ClassificationResult::primary(prediction),
                    None => {
                        warn!(kind = L::KIND, "No classifier answered, returning degraded label");
                        ClassificationResult::degraded()
                    }
                }
            }
        }
    }

    /// Model inference is CPU-bound, so it runs on the blocking pool.
    async fn run_primary(&self, text: &str) -> Result<Prediction<L>, ClassifyError> {
        let primary = Arc::clone(&self.primary);
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || primary.classify(&text))
            .await
            .map_err(|e| ClassifyError::Inference {
                reason: format!("classifier task failed: {}", e),
            })?
    }

    async fn run_fallback(&self, text: &str) -> Result<L, ClassifyError> {
        let attempts = self.policy.retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match tokio::time::timeout(self.policy.timeout, self.fallback.classify(text))
                .await
            {
                Ok(Ok(label)) => return Ok(label),
                Ok(Err(e)) => e,
                Err(_) => ClassifyError::Timeout {
                    timeout_ms: self.policy.timeout_ms(),
                },
            };

            if !error.is_transient() || attempt >= attempts {
                return Err(error);
            }

            warn!(
                kind = L::KIND,
                attempt,
                attempts,
                error = %error,
                "Fallback classification attempt failed, retrying"
            );
        }
    }
}
