//! Gemini HTTP backend
//!
//! Talks to the Generative Language REST API: `GET {base}/models` for the
//! capability listing and `POST {base}/{model}:generateContent` for text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use chempilot_config::Config;
use chempilot_utils::error::LlmError;

use crate::http_client::HttpClient;
use crate::types::{EndpointDescriptor, GenerationService};

const PROVIDER: &str = "gemini";

/// Header carrying the API key, so the key never appears in a URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub(crate) struct GeminiBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiBackend {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the API key environment
    /// variable is not set or the HTTP client cannot be constructed.
    pub fn new_from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key_env = config.api_key_env();
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Misconfiguration(format!(
                    "Gemini API key not found in environment variable '{}'. \
                     Set the variable or configure a different api_key_env in [llm].",
                    api_key_env
                ))
            })?;

        Self::new(api_key, config.base_url(), config.request_timeout())
    }

    fn generate_url(&self, endpoint: &str) -> String {
        let model = if endpoint.starts_with("models/") {
            endpoint.to_string()
        } else {
            format!("models/{endpoint}")
        };
        format!("{}/{}:generateContent", self.base_url, model)
    }

    /// Pull the text out of a response, or explain why there is none.
    fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Generation(format!("prompt blocked: {reason}")));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Generation("response contained no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(LlmError::Generation(format!(
                "empty response (finish reason: {reason})"
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl GenerationService for GeminiBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointDescriptor>, LlmError> {
        let url = format!("{}/models?pageSize=1000", self.base_url);
        let request = self.client.get(&url).header(API_KEY_HEADER, &self.api_key);

        let response = self
            .client
            .send(request, self.timeout, PROVIDER)
            .await
            .map_err(|e| LlmError::ServiceUnavailable(e.to_string()))?;

        let listing: ListModelsResponse = response.json().await.map_err(|e| {
            LlmError::ServiceUnavailable(format!("malformed model listing: {e}"))
        })?;

        debug!(count = listing.models.len(), "Fetched model listing");

        Ok(listing
            .models
            .into_iter()
            .map(|model| EndpointDescriptor {
                name: model.name,
                supported_operations: model.supported_generation_methods,
            })
            .collect())
    }

    async fn generate(&self, endpoint: &str, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let request = self
            .client
            .post(&self.generate_url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body);

        let response = self.client.send(request, self.timeout, PROVIDER).await?;
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("malformed generate response: {e}")))?;

        Self::extract_text(parsed)
    }
}
