use std::collections::HashMap;

use chempilot_utils::error::ConfigError;

use super::{Config, ConfigSource, Defaults, LlmConfig, ProjectConfig, RetryConfig, StubConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding chempilot without relying on environment
    /// variables or config files.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    provider: Option<String>,
    api_key_env: Option<String>,
    base_url: Option<String>,
    preferred_engines: Option<Vec<String>>,
    request_timeout_secs: Option<u64>,
    discovery_ttl_secs: Option<u64>,
    stub: Option<StubConfig>,
    backoff_secs: Option<Vec<u64>>,
    min_capacity_tpa: Option<u64>,
    cache_reports: Option<bool>,
    verbose: Option<bool>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn preferred_engines(mut self, patterns: Vec<String>) -> Self {
        self.preferred_engines = Some(patterns);
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn discovery_ttl_secs(mut self, secs: u64) -> Self {
        self.discovery_ttl_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn stub(mut self, stub: StubConfig) -> Self {
        self.stub = Some(stub);
        self
    }

    #[must_use]
    pub fn backoff_secs(mut self, delays: Vec<u64>) -> Self {
        self.backoff_secs = Some(delays);
        self
    }

    #[must_use]
    pub fn min_capacity_tpa(mut self, tpa: u64) -> Self {
        self.min_capacity_tpa = Some(tpa);
        self
    }

    #[must_use]
    pub fn cache_reports(mut self, enabled: bool) -> Self {
        self.cache_reports = Some(enabled);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if validation fails.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut attribute = |key: &str, set: bool| {
            let source = if set {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            source_attribution.insert(key.to_string(), source);
        };

        attribute("llm_provider", self.provider.is_some());
        attribute("retry_backoff_secs", self.backoff_secs.is_some());
        attribute("project_min_capacity_tpa", self.min_capacity_tpa.is_some());
        attribute("project_cache_reports", self.cache_reports.is_some());
        attribute("verbose", self.verbose.is_some());
        if self.api_key_env.is_some() {
            attribute("llm_api_key_env", true);
        }
        if self.base_url.is_some() {
            attribute("llm_base_url", true);
        }
        if self.preferred_engines.is_some() {
            attribute("llm_preferred_engines", true);
        }
        if self.request_timeout_secs.is_some() {
            attribute("llm_request_timeout_secs", true);
        }
        if self.discovery_ttl_secs.is_some() {
            attribute("llm_discovery_ttl_secs", true);
        }
        if self.stub.is_some() {
            attribute("llm_stub", true);
        }

        let project_defaults = ProjectConfig::default();
        let config = Config {
            llm: LlmConfig {
                provider: self.provider,
                api_key_env: self.api_key_env,
                base_url: self.base_url,
                preferred_engines: self.preferred_engines,
                request_timeout_secs: self.request_timeout_secs,
                discovery_ttl_secs: self.discovery_ttl_secs,
                stub: self.stub,
            },
            retry: match self.backoff_secs {
                Some(delays) => RetryConfig {
                    backoff_secs: Some(delays),
                },
                None => RetryConfig::default(),
            },
            project: ProjectConfig {
                min_capacity_tpa: self
                    .min_capacity_tpa
                    .or(project_defaults.min_capacity_tpa),
                cache_reports: self.cache_reports.or(project_defaults.cache_reports),
            },
            defaults: Defaults {
                verbose: self.verbose.or(Some(false)),
            },
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }
}
