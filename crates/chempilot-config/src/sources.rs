use std::collections::HashMap;

use chempilot_utils::types::ConfigSource;

use super::Config;

fn stable_source_label(source: &ConfigSource) -> &'static str {
    match source {
        ConfigSource::Cli => "cli",
        ConfigSource::Env => "env",
        ConfigSource::Config => "config",
        ConfigSource::Programmatic => "programmatic",
        ConfigSource::Default => "default",
    }
}

fn source_label(source: Option<&ConfigSource>) -> String {
    stable_source_label(source.unwrap_or(&ConfigSource::Default)).to_string()
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Config {
    /// Effective configuration as `key -> (value, source)` pairs.
    #[must_use]
    pub fn effective_config(&self) -> HashMap<String, (String, String)> {
        let mut config = HashMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = source_label(self.source_attribution.get(key));
            config.insert(key.to_string(), (value, source));
        };

        add_config("llm_provider", self.provider().to_string());
        add_config("llm_api_key_env", self.api_key_env().to_string());
        add_config("llm_base_url", self.base_url().to_string());
        add_config("llm_preferred_engines", join(&self.preferred_engines()));
        add_config(
            "llm_request_timeout_secs",
            self.request_timeout().as_secs().to_string(),
        );
        add_config(
            "llm_discovery_ttl_secs",
            self.discovery_ttl()
                .map_or(0, |ttl| ttl.as_secs())
                .to_string(),
        );
        add_config(
            "retry_backoff_secs",
            join(
                &self
                    .backoff()
                    .iter()
                    .map(|d| d.as_secs())
                    .collect::<Vec<_>>(),
            ),
        );
        add_config(
            "project_min_capacity_tpa",
            self.min_capacity_tpa().to_string(),
        );
        add_config("project_cache_reports", self.cache_reports().to_string());
        add_config("verbose", self.verbose().to_string());

        config
    }
}
