//! Engine discovery
//!
//! Picks one endpoint from the service's capability listing:
//!
//! 1. the first endpoint supporting `generateContent` whose name contains a
//!    preferred low-latency pattern (patterns tried in order, case-insensitive);
//! 2. otherwise the first endpoint supporting `generateContent`;
//! 3. otherwise `NoEngineAvailable`.
//!
//! Listing failures are reported, never retried. An optional TTL cache keeps
//! the last selection; it is dropped on any failure.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use chempilot_utils::error::InvokeError;

use crate::types::{EndpointDescriptor, GENERATE_CONTENT, GenerationService};

#[derive(Debug, Clone)]
struct CachedEndpoint {
    name: String,
    discovered_at: Instant,
}

/// Endpoint selector with an optional short-lived cache.
#[derive(Debug)]
pub struct EngineDiscovery {
    preferred: Vec<String>,
    ttl: Option<Duration>,
    cache: Mutex<Option<CachedEndpoint>>,
}

/// Choose an endpoint from a listing. Pure; see the module docs for the order.
#[must_use]
pub fn select_endpoint<'a>(
    endpoints: &'a [EndpointDescriptor],
    preferred: &[String],
) -> Option<&'a EndpointDescriptor> {
    let usable = || endpoints.iter().filter(|e| e.supports(GENERATE_CONTENT));

    for pattern in preferred {
        let pattern = pattern.to_lowercase();
        if let Some(found) = usable().find(|e| e.name.to_lowercase().contains(&pattern)) {
            return Some(found);
        }
    }

    usable().next()
}

impl EngineDiscovery {
    /// `ttl` of `None` disables caching: every attempt sequence re-discovers.
    #[must_use]
    pub fn new(preferred: Vec<String>, ttl: Option<Duration>) -> Self {
        Self {
            preferred,
            ttl,
            cache: Mutex::new(None),
        }
    }

    fn cached(&self) -> Option<String> {
        let ttl = self.ttl?;
        let guard = self.cache.lock().ok()?;
        guard
            .as_ref()
            .filter(|entry| entry.discovered_at.elapsed() < ttl)
            .map(|entry| entry.name.clone())
    }

    fn remember(&self, name: &str) {
        if self.ttl.is_none() {
            return;
        }
        if let Ok(mut guard) = self.cache.lock() {
            *guard = Some(CachedEndpoint {
                name: name.to_string(),
                discovered_at: Instant::now(),
            });
        }
    }

    /// Drop any cached selection.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.lock()
            && guard.take().is_some()
        {
            debug!("Discovery cache invalidated");
        }
    }

    /// Return a usable endpoint name.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::NoEngineAvailable` when the listing fails, is
    /// empty, or has no endpoint supporting content generation.
    pub async fn discover(&self, service: &dyn GenerationService) -> Result<String, InvokeError> {
        if let Some(name) = self.cached() {
            debug!(endpoint = %name, "Using cached endpoint");
            return Ok(name);
        }

        let endpoints = match service.list_endpoints().await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                self.invalidate();
                warn!(provider = service.provider(), error = %e, "Capability listing failed");
                return Err(InvokeError::NoEngineAvailable(e.to_string()));
            }
        };

        match select_endpoint(&endpoints, &self.preferred) {
            Some(endpoint) => {
                debug!(
                    provider = service.provider(),
                    endpoint = %endpoint.name,
                    listed = endpoints.len(),
                    "Selected endpoint"
                );
                self.remember(&endpoint.name);
                Ok(endpoint.name.clone())
            }
            None => {
                self.invalidate();
                Err(InvokeError::NoEngineAvailable(if endpoints.is_empty() {
                    "capability listing is empty".to_string()
                } else {
                    format!(
                        "none of {} listed endpoints supports {GENERATE_CONTENT}",
                        endpoints.len()
                    )
                }))
            }
        }
    }
}
