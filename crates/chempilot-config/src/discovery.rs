use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CliArgs, Config, ConfigSource, Defaults, LlmConfig, ProjectConfig, RetryConfig};

/// Directory searched for `config.toml`, relative to each ancestor.
const CONFIG_DIR_NAME: &str = ".chempilot";

/// Environment variable overriding the configured provider.
const PROVIDER_ENV: &str = "CHEMPILOT_PROVIDER";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    llm: Option<LlmConfig>,
    retry: Option<RetryConfig>,
    project: Option<ProjectConfig>,
    defaults: Option<Defaults>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// # Errors
    ///
    /// Fails when a config file exists but cannot be read or parsed, or when
    /// the merged configuration does not validate.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover configuration starting from a specific directory, falling back
    /// to the per-user config directory.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let user_dir = dirs::config_dir().map(|dir| dir.join("chempilot"));
        Self::discover_with(start_dir, user_dir.as_deref(), cli_args)
    }

    /// Path-driven discovery used by tests to avoid process-global state.
    pub fn discover_with(
        start_dir: &Path,
        user_config_dir: Option<&Path>,
        cli_args: &CliArgs,
    ) -> Result<Self> {
        let mut source_attribution = HashMap::new();

        let mut llm = LlmConfig::default();
        let mut retry = RetryConfig::default();
        let mut project = ProjectConfig::default();
        let mut defaults = Defaults::default();

        for key in [
            "llm_provider",
            "retry_backoff_secs",
            "project_min_capacity_tpa",
            "project_cache_reports",
            "verbose",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            Some(explicit_path.clone())
        } else {
            match Self::discover_config_file_from(start_dir)? {
                Some(path) => Some(path),
                None => user_config_dir
                    .map(|dir| dir.join("config.toml"))
                    .filter(|path| path.exists()),
            }
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading configuration file");
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;

            let config_source = ConfigSource::Config;

            if let Some(file_llm) = file_config.llm {
                if file_llm.provider.is_some() {
                    llm.provider = file_llm.provider;
                    source_attribution.insert("llm_provider".to_string(), config_source.clone());
                }
                if file_llm.api_key_env.is_some() {
                    llm.api_key_env = file_llm.api_key_env;
                    source_attribution
                        .insert("llm_api_key_env".to_string(), config_source.clone());
                }
                if file_llm.base_url.is_some() {
                    llm.base_url = file_llm.base_url;
                    source_attribution.insert("llm_base_url".to_string(), config_source.clone());
                }
                if file_llm.preferred_engines.is_some() {
                    llm.preferred_engines = file_llm.preferred_engines;
                    source_attribution
                        .insert("llm_preferred_engines".to_string(), config_source.clone());
                }
                if file_llm.request_timeout_secs.is_some() {
                    llm.request_timeout_secs = file_llm.request_timeout_secs;
                    source_attribution
                        .insert("llm_request_timeout_secs".to_string(), config_source.clone());
                }
                if file_llm.discovery_ttl_secs.is_some() {
                    llm.discovery_ttl_secs = file_llm.discovery_ttl_secs;
                    source_attribution
                        .insert("llm_discovery_ttl_secs".to_string(), config_source.clone());
                }
                if file_llm.stub.is_some() {
                    llm.stub = file_llm.stub;
                    source_attribution.insert("llm_stub".to_string(), config_source.clone());
                }
            }

            if let Some(file_retry) = file_config.retry
                && file_retry.backoff_secs.is_some()
            {
                retry.backoff_secs = file_retry.backoff_secs;
                source_attribution.insert("retry_backoff_secs".to_string(), config_source.clone());
            }

            if let Some(file_project) = file_config.project {
                if file_project.min_capacity_tpa.is_some() {
                    project.min_capacity_tpa = file_project.min_capacity_tpa;
                    source_attribution
                        .insert("project_min_capacity_tpa".to_string(), config_source.clone());
                }
                if file_project.cache_reports.is_some() {
                    project.cache_reports = file_project.cache_reports;
                    source_attribution
                        .insert("project_cache_reports".to_string(), config_source.clone());
                }
            }

            if let Some(file_defaults) = file_config.defaults
                && file_defaults.verbose.is_some()
            {
                defaults.verbose = file_defaults.verbose;
                source_attribution.insert("verbose".to_string(), config_source.clone());
            }
        }

        // Environment overrides the file, CLI overrides everything
        if let Ok(env_provider) = env::var(PROVIDER_ENV)
            && !env_provider.is_empty()
        {
            llm.provider = Some(env_provider);
            source_attribution.insert("llm_provider".to_string(), ConfigSource::Env);
        }

        if let Some(provider) = &cli_args.provider {
            llm.provider = Some(provider.clone());
            source_attribution.insert("llm_provider".to_string(), ConfigSource::Cli);
        }

        if let Some(backoff) = &cli_args.backoff_secs {
            retry.backoff_secs = Some(backoff.clone());
            source_attribution.insert("retry_backoff_secs".to_string(), ConfigSource::Cli);
        }

        if let Some(verbose) = cli_args.verbose {
            defaults.verbose = Some(verbose);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }

        let config = Self {
            llm,
            retry,
            project,
            defaults,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// Walk up from `start_dir` looking for `.chempilot/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or the filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR_NAME).join("config.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        Ok(None)
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })?;
                Ok(config)
            }
            // An explicit path that does not exist falls back to defaults
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }
}
