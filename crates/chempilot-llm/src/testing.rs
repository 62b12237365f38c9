//! Scripted generation service for tests.
//!
//! Responses are served from a queue; once it drains, the fallback response
//! repeats. Calls are counted so tests can assert on retry behaviour.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chempilot_utils::error::LlmError;

use crate::types::{EndpointDescriptor, GENERATE_CONTENT, GenerationService};

type Response = Result<String, LlmError>;

pub struct ScriptedService {
    listing: Result<Vec<EndpointDescriptor>, LlmError>,
    queue: Mutex<VecDeque<Response>>,
    fallback: Response,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    endpoints_used: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new(listing: Vec<EndpointDescriptor>) -> Self {
        Self::with_listing(Ok(listing))
    }

    /// Capability listing always fails.
    pub fn offline() -> Self {
        Self::with_listing(Err(LlmError::ServiceUnavailable(
            "connection refused".to_string(),
        )))
    }

    fn with_listing(listing: Result<Vec<EndpointDescriptor>, LlmError>) -> Self {
        Self {
            listing,
            queue: Mutex::new(VecDeque::new()),
            fallback: Ok("scripted report".to_string()),
            latency: None,
            list_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            endpoints_used: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue one response.
    pub fn respond(mut self, response: Response) -> Self {
        if let Ok(queue) = self.queue.get_mut() {
            queue.push_back(response);
        }
        self
    }

    /// Response repeated after the queue drains.
    pub fn always(mut self, response: Response) -> Self {
        self.fallback = response;
        self
    }

    /// Sleep before every generate response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn endpoints_used(&self) -> Vec<String> {
        self.endpoints_used
            .lock()
            .map(|used| used.clone())
            .unwrap_or_default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

impl Default for ScriptedService {
    /// Lists `models/scripted-pro` and `models/scripted-flash`.
    fn default() -> Self {
        Self::new(vec![
            EndpointDescriptor::new("models/scripted-pro", &[GENERATE_CONTENT]),
            EndpointDescriptor::new("models/scripted-flash", &[GENERATE_CONTENT]),
        ])
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn list_endpoints(&self) -> Result<Vec<EndpointDescriptor>, LlmError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing.clone()
    }

    async fn generate(&self, endpoint: &str, prompt: &str) -> Result<String, LlmError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut used) = self.endpoints_used.lock() {
            used.push(endpoint.to_string());
        }
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.queue.lock().ok().and_then(|mut queue| queue.pop_front());
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
