//! Offline stub backend
//!
//! Deterministic generation service for dry runs and end-to-end tests. The
//! output depends only on the endpoint and the prompt. Failures can be
//! scripted through `[llm.stub]`.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

use chempilot_config::StubConfig;
use chempilot_utils::error::LlmError;

use crate::types::{EndpointDescriptor, GENERATE_CONTENT, GenerationService};

const PROVIDER: &str = "stub";

/// Endpoints advertised when `[llm.stub] engines` is unset.
const DEFAULT_ENGINES: &[&str] = &["models/stub-pro", "models/stub-flash"];

/// Forced failure behaviour of the stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    /// Capability listing fails.
    Offline,
    /// Every generate call is rate limited.
    Quota,
    /// Every generate call fails fatally.
    Generation,
}

impl StubFailure {
    fn parse(value: &str) -> Result<Self, LlmError> {
        match value {
            "offline" => Ok(Self::Offline),
            "quota" => Ok(Self::Quota),
            "generation" => Ok(Self::Generation),
            other => Err(LlmError::Misconfiguration(format!(
                "unknown stub failure '{other}'"
            ))),
        }
    }
}

pub struct StubBackend {
    engines: Vec<String>,
    failure: Option<StubFailure>,
    /// Leading generate calls still to be answered with a rate limit.
    rate_limits_remaining: AtomicU32,
}

impl StubBackend {
    #[must_use]
    pub fn new(engines: Vec<String>) -> Self {
        Self {
            engines,
            failure: None,
            rate_limits_remaining: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_failure(mut self, failure: StubFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    #[must_use]
    pub fn with_rate_limits(self, count: u32) -> Self {
        self.rate_limits_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` for an unknown failure mode.
    pub fn from_stub_config(config: &StubConfig) -> Result<Self, LlmError> {
        let engines = config.engines.clone().unwrap_or_else(|| {
            DEFAULT_ENGINES.iter().map(|e| (*e).to_string()).collect()
        });
        let mut backend =
            Self::new(engines).with_rate_limits(config.rate_limit_failures.unwrap_or(0));
        if let Some(failure) = &config.failure {
            backend = backend.with_failure(StubFailure::parse(failure)?);
        }
        Ok(backend)
    }

    fn render(endpoint: &str, prompt: &str) -> String {
        let digest = blake3::hash(prompt.as_bytes()).to_hex();
        let heading = prompt
            .lines()
            .find(|line| line.starts_with("Phase "))
            .unwrap_or("Utility load");
        format!(
            "{heading}\n\
             Generated offline by {endpoint} (prompt {digest})\n\
             Summary: scale and route are consistent with the stated inputs.\n\
             Budgetary estimate: INR 0 (stub output)\n\
             Next step: review with a qualified engineer.",
            digest = &digest[..12],
        )
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINES.iter().map(|e| (*e).to_string()).collect())
    }
}

#[async_trait]
impl GenerationService for StubBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointDescriptor>, LlmError> {
        if self.failure == Some(StubFailure::Offline) {
            return Err(LlmError::ServiceUnavailable(
                "stub configured offline".to_string(),
            ));
        }
        Ok(self
            .engines
            .iter()
            .map(|name| EndpointDescriptor::new(name.clone(), &[GENERATE_CONTENT]))
            .collect())
    }

    async fn generate(&self, endpoint: &str, prompt: &str) -> Result<String, LlmError> {
        match self.failure {
            Some(StubFailure::Quota) => {
                return Err(LlmError::RateLimited("stub quota exhausted".to_string()));
            }
            Some(StubFailure::Generation) => {
                return Err(LlmError::Generation(
                    "stub generation failure".to_string(),
                ));
            }
            _ => {}
        }

        let limited = self
            .rate_limits_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if limited {
            debug!(endpoint, "Stub answering with rate limit");
            return Err(LlmError::RateLimited("stub rate limit".to_string()));
        }

        Ok(Self::render(endpoint, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let stub = StubBackend::default();
        let a = stub.generate("models/stub-flash", "Phase 1 of 8: X").await.unwrap();
        let b = stub.generate("models/stub-flash", "Phase 1 of 8: X").await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("Phase 1 of 8: X"));
    }

    #[tokio::test]
    async fn test_scripted_rate_limits_then_success() {
        let stub = StubBackend::default().with_rate_limits(2);
        assert!(stub.generate("e", "p").await.unwrap_err().is_rate_limited());
        assert!(stub.generate("e", "p").await.unwrap_err().is_rate_limited());
        assert!(stub.generate("e", "p").await.is_ok());
    }

    #[tokio::test]
    async fn test_offline_listing_fails() {
        let stub = StubBackend::default().with_failure(StubFailure::Offline);
        assert!(matches!(
            stub.list_endpoints().await,
            Err(LlmError::ServiceUnavailable(_))
        ));
    }

    #[test]
    fn test_from_stub_config() {
        let config = StubConfig {
            engines: Some(vec!["models/only".to_string()]),
            rate_limit_failures: Some(1),
            failure: None,
        };
        let stub = StubBackend::from_stub_config(&config).unwrap();
        assert_eq!(stub.engines, vec!["models/only"]);

        let bad = StubConfig {
            failure: Some("meltdown".to_string()),
            ..StubConfig::default()
        };
        assert!(StubBackend::from_stub_config(&bad).is_err());
    }
}
