//! Shared HTTP client infrastructure for HTTP-based generation services
//!
//! One `reqwest::Client` is built per adapter and reused for every call.
//! Requests are sent exactly once: rate-limit retries belong to the
//! resilient invoker, and nothing else is retried.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use chempilot_utils::error::LlmError;
use chempilot_utils::redaction::redact_error_message;

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured error status the service uses for quota exhaustion.
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                LlmError::Misconfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request once and classify any failure.
    ///
    /// # Errors
    ///
    /// - `LlmError::Timeout` when `timeout` elapses
    /// - `LlmError::Transport` for connection failures
    /// - the variant chosen by [`classify_failure`] for non-2xx responses
    pub async fn send(
        &self,
        request: RequestBuilder,
        timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        debug!(
            provider = provider_name,
            timeout_secs = timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = match request.timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(LlmError::Timeout { duration: timeout }),
            Err(e) => {
                return Err(LlmError::Transport(format!(
                    "{} request failed: {}",
                    provider_name,
                    redact_error_message(&e.to_string())
                )));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body, provider_name))
    }
}

/// Map a failed HTTP response to an `LlmError` variant.
///
/// The structured `error.status` field wins over the HTTP status when both
/// are present:
/// - 429 or `RESOURCE_EXHAUSTED` → `RateLimited`
/// - 401/403, `UNAUTHENTICATED` or `PERMISSION_DENIED` → `ProviderAuth`
/// - 404 or `NOT_FOUND` → `EndpointNotFound`
/// - anything else → `Generation`, message preserved
pub(crate) fn classify_failure(status: StatusCode, body: &str, provider_name: &str) -> LlmError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), None),
    };
    let detail = if message.is_empty() {
        format!("{provider_name} returned {status}")
    } else {
        format!(
            "{provider_name} returned {status}: {}",
            redact_error_message(&message)
        )
    };

    match api_status.as_deref() {
        Some(RESOURCE_EXHAUSTED) => return LlmError::RateLimited(detail),
        Some("UNAUTHENTICATED" | "PERMISSION_DENIED") => return LlmError::ProviderAuth(detail),
        Some("NOT_FOUND") => return LlmError::EndpointNotFound(detail),
        _ => {}
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::ProviderAuth(detail),
        StatusCode::NOT_FOUND => LlmError::EndpointNotFound(detail),
        _ => LlmError::Generation(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_construction() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_429_is_rate_limited() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "", "gemini");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_resource_exhausted_status_is_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded for metric","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, body, "gemini");
        assert_eq!(
            err,
            LlmError::RateLimited(
                "gemini returned 429 Too Many Requests: Quota exceeded for metric".to_string()
            )
        );
    }

    #[test]
    fn test_not_found_is_endpoint_invalid() {
        let body = r#"{"error":{"code":404,"message":"models/gemini-pro is not found","status":"NOT_FOUND"}}"#;
        let err = classify_failure(StatusCode::NOT_FOUND, body, "gemini");
        assert!(err.is_endpoint_invalid());
    }

    #[test]
    fn test_auth_failures() {
        assert!(matches!(
            classify_failure(StatusCode::FORBIDDEN, "", "gemini"),
            LlmError::ProviderAuth(_)
        ));
        let body = r#"{"error":{"code":400,"message":"bad key","status":"UNAUTHENTICATED"}}"#;
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body, "gemini"),
            LlmError::ProviderAuth(_)
        ));
    }

    #[test]
    fn test_other_failures_keep_message() {
        let body = r#"{"error":{"code":400,"message":"Invalid JSON payload received","status":"INVALID_ARGUMENT"}}"#;
        match classify_failure(StatusCode::BAD_REQUEST, body, "gemini") {
            LlmError::Generation(msg) => assert!(msg.contains("Invalid JSON payload received")),
            other => panic!("expected generation error, got {other:?}"),
        }
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "oops", "gemini"),
            LlmError::Generation(_)
        ));
    }
}
