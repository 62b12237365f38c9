//! Resilient invocation
//!
//! Wraps a [`GenerationService`] with engine discovery and a bounded backoff
//! schedule. Only rate limits are retried: each one consumes the next delay
//! of the schedule. A stale endpoint triggers one re-discovery without
//! consuming a delay. Every other failure is fatal and returned at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use chempilot_utils::error::{InvokeError, LlmError};

use crate::discovery::EngineDiscovery;
use crate::types::GenerationService;

/// Shared flag checked before every attempt; set it to stop between retries.
pub type CancellationFlag = Arc<AtomicBool>;

/// Result of one attempt sequence that did not fail fatally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Completed {
        text: String,
        /// Endpoint that produced the text
        engine: String,
        /// Generate calls made, including rate-limited ones
        attempts: u32,
    },
    /// Every delay of the schedule was consumed by rate limits.
    QuotaExceeded { attempts: u32 },
}

impl InvocationOutcome {
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Completed { attempts, .. } | Self::QuotaExceeded { attempts } => *attempts,
        }
    }
}

pub struct ResilientInvoker {
    service: Arc<dyn GenerationService>,
    discovery: EngineDiscovery,
    backoff: Vec<Duration>,
    cancel: Option<CancellationFlag>,
}

impl ResilientInvoker {
    /// Invoker with no discovery preference and no discovery cache.
    #[must_use]
    pub fn new(service: Arc<dyn GenerationService>, backoff: Vec<Duration>) -> Self {
        Self {
            service,
            discovery: EngineDiscovery::new(Vec::new(), None),
            backoff,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_discovery(mut self, discovery: EngineDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn backoff(&self) -> &[Duration] {
        &self.backoff
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.service.provider()
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run one attempt sequence for `prompt`.
    ///
    /// Makes at most `backoff().len() + 1` generate calls, plus one more if the
    /// endpoint had to be re-discovered.
    ///
    /// # Errors
    ///
    /// - `InvokeError::NoEngineAvailable` when discovery finds nothing usable
    /// - `InvokeError::GenerationFailed` for any non-rate-limit failure
    /// - `InvokeError::Cancelled` when the cancellation flag is set
    pub async fn invoke(&self, prompt: &str) -> Result<InvocationOutcome, InvokeError> {
        if self.cancelled() {
            return Err(InvokeError::Cancelled);
        }

        let mut endpoint = self.discovery.discover(self.service.as_ref()).await?;
        let mut delays = self.backoff.iter();
        let mut rediscovered = false;
        let mut attempts: u32 = 0;

        loop {
            if self.cancelled() {
                debug!(attempts, "Invocation cancelled");
                return Err(InvokeError::Cancelled);
            }

            attempts += 1;
            debug!(endpoint = %endpoint, attempt = attempts, "Generate attempt");

            match self.service.generate(&endpoint, prompt).await {
                Ok(text) => {
                    info!(endpoint = %endpoint, attempts, "Generation completed");
                    return Ok(InvocationOutcome::Completed {
                        text,
                        engine: endpoint,
                        attempts,
                    });
                }
                Err(LlmError::RateLimited(detail)) => match delays.next() {
                    Some(delay) => {
                        warn!(
                            endpoint = %endpoint,
                            attempt = attempts,
                            delay_ms = delay.as_millis() as u64,
                            detail = %detail,
                            "Rate limited, backing off"
                        );
                        tokio::time::sleep(*delay).await;
                    }
                    None => {
                        warn!(attempts, "Backoff schedule exhausted");
                        return Ok(InvocationOutcome::QuotaExceeded { attempts });
                    }
                },
                Err(LlmError::EndpointNotFound(detail)) if !rediscovered => {
                    warn!(
                        endpoint = %endpoint,
                        detail = %detail,
                        "Endpoint vanished, re-discovering"
                    );
                    rediscovered = true;
                    self.discovery.invalidate();
                    endpoint = self.discovery.discover(self.service.as_ref()).await?;
                }
                Err(err) => {
                    self.discovery.invalidate();
                    warn!(endpoint = %endpoint, attempts, error = %err, "Generation failed");
                    return Err(InvokeError::GenerationFailed(err.to_string()));
                }
            }
        }
    }
}
