//! Configuration management for chempilot
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. TOML files carry `[llm]`, `[retry]`, `[project]`
//! and `[defaults]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use model::*;
pub use chempilot_utils::types::ConfigSource;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(".chempilot");
        fs::create_dir_all(&config_dir).unwrap();

        let config_path = config_dir.join("config.toml");
        fs::write(&config_path, content).unwrap();

        config_path
    }

    #[test]
    fn test_default_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let config = Config::discover_with(temp_dir.path(), None, &CliArgs::default()).unwrap();
        assert_eq!(config.provider(), "gemini");
        assert_eq!(config.api_key_env(), "GEMINI_API_KEY");
        assert_eq!(config.preferred_engines(), vec!["flash".to_string()]);
        assert_eq!(
            config.backoff(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(5),
                Duration::from_secs(20),
                Duration::from_secs(60)
            ]
        );
        assert_eq!(config.discovery_ttl(), None);
        assert!(config.cache_reports());
        assert_eq!(
            config.source_attribution.get("retry_backoff_secs"),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn test_config_discovery_with_cli_override() {
        let temp_dir = TempDir::new().unwrap();
        create_test_config_file(
            temp_dir.path(),
            r#"
[llm]
provider = "stub"
preferred_engines = ["flash-lite", "flash"]
discovery_ttl_secs = 300

[retry]
backoff_secs = [2, 4]

[project]
min_capacity_tpa = 5000
"#,
        );

        let cli_args = CliArgs {
            backoff_secs: Some(vec![0, 0, 0]),
            verbose: Some(true),
            ..CliArgs::default()
        };

        let config = Config::discover_with(temp_dir.path(), None, &cli_args).unwrap();

        assert_eq!(config.backoff().len(), 3);
        assert!(config.verbose());
        assert_eq!(
            config.source_attribution.get("retry_backoff_secs"),
            Some(&ConfigSource::Cli)
        );

        assert_eq!(config.provider(), "stub");
        assert_eq!(config.min_capacity_tpa(), 5000);
        assert_eq!(config.discovery_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(
            config.source_attribution.get("llm_provider"),
            Some(&ConfigSource::Config)
        );
    }

    #[test]
    fn test_discovery_walks_upward() {
        let temp_dir = TempDir::new().unwrap();
        create_test_config_file(temp_dir.path(), "[llm]\nprovider = \"stub\"\n");
        let nested = temp_dir.path().join("plants").join("dahej");
        fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_config_file_from(&nested).unwrap();
        assert_eq!(
            found,
            Some(temp_dir.path().join(".chempilot").join("config.toml"))
        );
    }

    #[test]
    fn test_discovery_stops_at_repository_root() {
        let temp_dir = TempDir::new().unwrap();
        create_test_config_file(temp_dir.path(), "[llm]\nprovider = \"stub\"\n");
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(Config::discover_config_file_from(&repo).unwrap(), None);
    }

    #[test]
    fn test_user_config_dir_fallback() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join(".git")).unwrap();
        let user = TempDir::new().unwrap();
        fs::write(
            user.path().join("config.toml"),
            "[project]\ncache_reports = false\n",
        )
        .unwrap();

        let config =
            Config::discover_with(project.path(), Some(user.path()), &CliArgs::default()).unwrap();
        assert!(!config.cache_reports());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        create_test_config_file(temp_dir.path(), "[llm\nprovider = ");

        let err = Config::discover_with(temp_dir.path(), None, &CliArgs::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to load config file"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = Config::builder().provider("openai").build().unwrap_err();
        match err {
            chempilot_utils::error::ConfigError::InvalidValue { key, .. } => {
                assert_eq!(key, "llm.provider");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backoff_bounds_are_validated() {
        assert!(Config::builder().backoff_secs(vec![1; 11]).build().is_err());
        assert!(Config::builder().backoff_secs(vec![601]).build().is_err());
        // An empty sequence disables retries entirely
        assert!(Config::builder().backoff_secs(Vec::new()).build().is_ok());
    }

    #[test]
    fn test_stub_failure_mode_is_validated() {
        let stub = StubConfig {
            failure: Some("explode".to_string()),
            ..StubConfig::default()
        };
        assert!(Config::builder().provider("stub").stub(stub).build().is_err());
    }

    #[test]
    fn test_builder_source_attribution() {
        let config = Config::builder()
            .provider("stub")
            .min_capacity_tpa(10)
            .build()
            .unwrap();
        assert_eq!(
            config.source_attribution.get("llm_provider"),
            Some(&ConfigSource::Programmatic)
        );
        assert_eq!(
            config.source_attribution.get("verbose"),
            Some(&ConfigSource::Default)
        );
        assert_eq!(config.min_capacity_tpa(), 10);
    }

    #[test]
    fn test_effective_config_reports_sources() {
        let config = Config::builder().provider("stub").build().unwrap();
        let effective = config.effective_config();
        assert_eq!(
            effective.get("llm_provider"),
            Some(&("stub".to_string(), "programmatic".to_string()))
        );
        assert_eq!(
            effective.get("retry_backoff_secs"),
            Some(&("1,5,20,60".to_string(), "default".to_string()))
        );
    }
}
