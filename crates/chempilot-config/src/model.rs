use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use chempilot_utils::types::ConfigSource;

/// Provider used when nothing else is configured.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Environment variable holding the generation service API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Name fragments of low-latency engines preferred by discovery.
pub const DEFAULT_PREFERRED_ENGINES: &[&str] = &["flash"];

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Discovery results are not cached by default.
pub const DEFAULT_DISCOVERY_TTL_SECS: u64 = 0;

/// Seconds slept before each retry of a rate-limited generation call.
pub const DEFAULT_BACKOFF_SECS: &[u64] = &[1, 5, 20, 60];

pub const DEFAULT_MIN_CAPACITY_TPA: u64 = 1_000;

/// Providers the factory knows how to build.
pub const KNOWN_PROVIDERS: &[&str] = &["gemini", "stub"];

/// Configuration for chempilot.
///
/// Precedence: CLI arguments > config file > built-in defaults. Every key
/// records where its value came from in `source_attribution`.
///
/// # Example
///
/// ```rust
/// use chempilot_config::Config;
///
/// let config = Config::builder()
///     .provider("stub")
///     .backoff_secs(vec![0, 0])
///     .build()
///     .expect("valid config");
/// assert_eq!(config.backoff().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub project: ProjectConfig,
    pub defaults: Defaults,
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[llm]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// "gemini" or "stub"
    pub provider: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub preferred_engines: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
    /// 0 disables the discovery cache
    pub discovery_ttl_secs: Option<u64>,
    pub stub: Option<StubConfig>,
}

/// `[llm.stub]` section, used by the offline provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StubConfig {
    /// Endpoint names advertised by the stub
    pub engines: Option<Vec<String>>,
    /// Number of leading generate calls answered with a rate-limit error
    pub rate_limit_failures: Option<u32>,
    /// Forced failure: "offline", "quota" or "generation"
    pub failure: Option<String>,
}

/// `[retry]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    pub backoff_secs: Option<Vec<u64>>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            backoff_secs: Some(DEFAULT_BACKOFF_SECS.to_vec()),
        }
    }
}

/// `[project]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub min_capacity_tpa: Option<u64>,
    pub cache_reports: Option<bool>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            min_capacity_tpa: Some(DEFAULT_MIN_CAPACITY_TPA),
            cache_reports: Some(true),
        }
    }
}

/// `[defaults]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    pub verbose: Option<bool>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Configuration with built-in defaults only and the offline stub
    /// provider, for tests and dry runs.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        let mut source_attribution = HashMap::new();
        source_attribution.insert("llm_provider".to_string(), ConfigSource::Programmatic);
        Self {
            llm: LlmConfig {
                provider: Some("stub".to_string()),
                ..LlmConfig::default()
            },
            retry: RetryConfig {
                backoff_secs: Some(vec![0, 0]),
            },
            project: ProjectConfig::default(),
            defaults: Defaults::default(),
            source_attribution,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.llm.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.llm.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn preferred_engines(&self) -> Vec<String> {
        match &self.llm.preferred_engines {
            Some(engines) => engines.clone(),
            None => DEFAULT_PREFERRED_ENGINES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.llm
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Discovery cache lifetime, `None` when caching is off.
    #[must_use]
    pub fn discovery_ttl(&self) -> Option<Duration> {
        match self.llm.discovery_ttl_secs.unwrap_or(DEFAULT_DISCOVERY_TTL_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    #[must_use]
    pub fn stub(&self) -> StubConfig {
        self.llm.stub.clone().unwrap_or_default()
    }

    /// The ordered backoff sequence. Its length bounds the number of retries.
    #[must_use]
    pub fn backoff(&self) -> Vec<Duration> {
        self.retry
            .backoff_secs
            .as_deref()
            .unwrap_or(DEFAULT_BACKOFF_SECS)
            .iter()
            .map(|secs| Duration::from_secs(*secs))
            .collect()
    }

    #[must_use]
    pub fn min_capacity_tpa(&self) -> u64 {
        self.project
            .min_capacity_tpa
            .unwrap_or(DEFAULT_MIN_CAPACITY_TPA)
    }

    #[must_use]
    pub fn cache_reports(&self) -> bool {
        self.project.cache_reports.unwrap_or(true)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }
}
