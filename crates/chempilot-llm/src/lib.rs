//! Generation service abstraction for report generation
//!
//! Every provider implements [`GenerationService`]. On top of it sit
//! [`EngineDiscovery`], which picks an endpoint from the capability listing,
//! and [`ResilientInvoker`], which retries rate limits along a bounded
//! backoff schedule.

pub mod discovery;
mod gemini_backend;
pub(crate) mod http_client;
pub mod invoker;
mod stub_backend;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use std::sync::Arc;

pub use discovery::{EngineDiscovery, select_endpoint};
pub use invoker::{CancellationFlag, InvocationOutcome, ResilientInvoker};
pub use stub_backend::{StubBackend, StubFailure};
pub use types::{EndpointDescriptor, GENERATE_CONTENT, GenerationService};
pub use chempilot_utils::error::{InvokeError, LlmError};

pub(crate) use gemini_backend::GeminiBackend;

use chempilot_config::Config;

/// Construct the generation service named by `[llm] provider`.
///
/// # Errors
///
/// Returns `LlmError::Misconfiguration` if the provider is unknown or its
/// settings are unusable (for Gemini, a missing API key).
pub fn from_config(config: &Config) -> Result<Arc<dyn GenerationService>, LlmError> {
    match config.provider() {
        "gemini" => Ok(Arc::new(GeminiBackend::new_from_config(config)?)),
        "stub" => Ok(Arc::new(StubBackend::from_stub_config(&config.stub())?)),
        unknown => Err(LlmError::Misconfiguration(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: gemini, stub."
        ))),
    }
}

/// Build a [`ResilientInvoker`] wired with the configured discovery
/// preferences, discovery cache and backoff schedule.
///
/// # Errors
///
/// Same as [`from_config`].
pub fn invoker_from_config(config: &Config) -> Result<ResilientInvoker, LlmError> {
    let service = from_config(config)?;
    let discovery = EngineDiscovery::new(config.preferred_engines(), config.discovery_ttl());
    Ok(ResilientInvoker::new(service, config.backoff()).with_discovery(discovery))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempilot_config::StubConfig;
    use std::time::Duration;

    #[test]
    fn test_stub_provider_from_config() {
        let config = Config::minimal_for_testing();
        let service = from_config(&config).unwrap();
        assert_eq!(service.provider(), "stub");
    }

    #[test]
    fn test_invoker_uses_configured_backoff() {
        let config = Config::builder()
            .provider("stub")
            .backoff_secs(vec![2, 4])
            .build()
            .unwrap();
        let invoker = invoker_from_config(&config).unwrap();
        assert_eq!(
            invoker.backoff(),
            &[Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_stub_invoker_end_to_end() {
        let config = Config::builder()
            .provider("stub")
            .backoff_secs(vec![0])
            .stub(StubConfig {
                rate_limit_failures: Some(1),
                ..StubConfig::default()
            })
            .build()
            .unwrap();
        let invoker = invoker_from_config(&config).unwrap();
        let outcome = invoker.invoke("Phase 1 of 8: Feasibility").await.unwrap();
        match outcome {
            InvocationOutcome::Completed {
                text,
                engine,
                attempts,
            } => {
                assert!(text.starts_with("Phase 1 of 8: Feasibility"));
                assert_eq!(engine, "models/stub-flash");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
