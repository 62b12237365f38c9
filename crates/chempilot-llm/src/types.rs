//! Core types for the generation service abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chempilot_utils::error::LlmError;

/// Operation name an endpoint must advertise to be usable for reports.
pub const GENERATE_CONTENT: &str = "generateContent";

/// One entry of the service's capability listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Endpoint identifier, e.g. `models/gemini-2.0-flash`
    pub name: String,
    pub supported_operations: Vec<String>,
}

impl EndpointDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, operations: &[&str]) -> Self {
        Self {
            name: name.into(),
            supported_operations: operations.iter().map(|op| (*op).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn supports(&self, operation: &str) -> bool {
        self.supported_operations.iter().any(|op| op == operation)
    }
}

/// Trait implemented by every generation service adapter.
///
/// Adapters classify failures into [`LlmError`] variants once, at this
/// boundary. Callers match on the variant and never inspect the message.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Short provider name for logs.
    fn provider(&self) -> &str;

    /// Query the capability listing.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::ServiceUnavailable` when the listing cannot be
    /// obtained (network, auth, outage).
    async fn list_endpoints(&self) -> Result<Vec<EndpointDescriptor>, LlmError>;

    /// Generate text for `prompt` on `endpoint`.
    ///
    /// # Errors
    ///
    /// - `LlmError::RateLimited` when the service is over quota
    /// - `LlmError::EndpointNotFound` when `endpoint` no longer exists
    /// - any other variant for fatal failures
    async fn generate(&self, endpoint: &str, prompt: &str) -> Result<String, LlmError>;
}
