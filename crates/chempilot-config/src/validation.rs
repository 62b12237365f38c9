use chempilot_utils::error::ConfigError;

use super::{Config, KNOWN_PROVIDERS};

/// Upper bound on the number of retries a backoff sequence may request.
const MAX_BACKOFF_STEPS: usize = 10;

/// Upper bound on a single backoff delay.
const MAX_BACKOFF_SECS: u64 = 600;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first key out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = self.provider();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(invalid(
                "llm.provider",
                format!(
                    "unknown provider '{provider}' (expected one of: {})",
                    KNOWN_PROVIDERS.join(", ")
                ),
            ));
        }

        if self.api_key_env().trim().is_empty() {
            return Err(invalid("llm.api_key_env", "must not be empty"));
        }

        let base_url = self.base_url();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(invalid(
                "llm.base_url",
                format!("'{base_url}' must be an http(s) URL"),
            ));
        }

        if let Some(engines) = &self.llm.preferred_engines
            && engines.iter().any(|pattern| pattern.trim().is_empty())
        {
            return Err(invalid(
                "llm.preferred_engines",
                "patterns must not be empty",
            ));
        }

        if let Some(timeout) = self.llm.request_timeout_secs
            && !(1..=600).contains(&timeout)
        {
            return Err(invalid(
                "llm.request_timeout_secs",
                "must be between 1 and 600 seconds",
            ));
        }

        if let Some(ttl) = self.llm.discovery_ttl_secs
            && ttl > 86_400
        {
            return Err(invalid(
                "llm.discovery_ttl_secs",
                "exceeds maximum of 86400 seconds (1 day)",
            ));
        }

        if let Some(stub) = &self.llm.stub
            && let Some(failure) = &stub.failure
            && !matches!(failure.as_str(), "offline" | "quota" | "generation")
        {
            return Err(invalid(
                "llm.stub.failure",
                format!("unknown failure '{failure}' (expected offline, quota or generation)"),
            ));
        }

        if let Some(backoff) = &self.retry.backoff_secs {
            if backoff.len() > MAX_BACKOFF_STEPS {
                return Err(invalid(
                    "retry.backoff_secs",
                    format!("at most {MAX_BACKOFF_STEPS} delays are allowed"),
                ));
            }
            if backoff.iter().any(|secs| *secs > MAX_BACKOFF_SECS) {
                return Err(invalid(
                    "retry.backoff_secs",
                    format!("each delay must be at most {MAX_BACKOFF_SECS} seconds"),
                ));
            }
        }

        if self.project.min_capacity_tpa == Some(0) {
            return Err(invalid(
                "project.min_capacity_tpa",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}
