//! Configuration discovery and precedence: CLI > environment > file > defaults.

use serial_test::serial;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use chempilot::{CliArgs, Config};

fn write_config(root: &Path, body: &str) {
    let dir = root.join(".chempilot");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), body).unwrap();
}

fn source(config: &Config, key: &str) -> String {
    config.effective_config()[key].1.clone()
}

#[test]
#[serial]
fn defaults_apply_without_a_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    // SAFETY: serialized with every other test touching the environment.
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    let config = Config::discover_with(temp.path(), None, &CliArgs::default()).unwrap();

    assert_eq!(config.provider(), "gemini");
    assert_eq!(
        config.backoff(),
        [1, 5, 20, 60].map(Duration::from_secs).to_vec()
    );
    assert_eq!(config.min_capacity_tpa(), 1_000);
    assert!(config.cache_reports());
    assert_eq!(source(&config, "llm_provider"), "default");
}

#[test]
#[serial]
fn file_is_found_from_a_nested_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    write_config(
        temp.path(),
        r#"
[llm]
provider = "stub"

[project]
min_capacity_tpa = 500
"#,
    );
    let nested = temp.path().join("plants").join("dahej");
    fs::create_dir_all(&nested).unwrap();
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    let config = Config::discover_with(&nested, None, &CliArgs::default()).unwrap();

    assert_eq!(config.provider(), "stub");
    assert_eq!(config.min_capacity_tpa(), 500);
    assert_eq!(source(&config, "llm_provider"), "config");
    assert_eq!(source(&config, "project_min_capacity_tpa"), "config");
    assert_eq!(source(&config, "retry_backoff_secs"), "default");
}

#[test]
#[serial]
fn search_stops_at_repository_root() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "[llm]\nprovider = \"stub\"\n");
    let repo = temp.path().join("repo");
    fs::create_dir_all(repo.join(".git")).unwrap();
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    let config = Config::discover_with(&repo, None, &CliArgs::default()).unwrap();

    assert_eq!(config.provider(), "gemini");
}

#[test]
#[serial]
fn user_config_directory_is_the_fallback() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    fs::create_dir_all(project.join(".git")).unwrap();
    let user_dir = temp.path().join("user");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("config.toml"), "[retry]\nbackoff_secs = [2]\n").unwrap();
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    let config = Config::discover_with(&project, Some(&user_dir), &CliArgs::default()).unwrap();

    assert_eq!(config.backoff(), vec![Duration::from_secs(2)]);
}

#[test]
#[serial]
fn environment_and_cli_override_the_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    write_config(
        temp.path(),
        "[llm]\nprovider = \"gemini\"\n\n[retry]\nbackoff_secs = [1, 5]\n",
    );

    unsafe { std::env::set_var("CHEMPILOT_PROVIDER", "stub") };
    let from_env = Config::discover_with(temp.path(), None, &CliArgs::default());
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };
    let from_env = from_env.unwrap();
    assert_eq!(from_env.provider(), "stub");
    assert_eq!(source(&from_env, "llm_provider"), "env");
    assert_eq!(source(&from_env, "retry_backoff_secs"), "config");

    let cli_args = CliArgs {
        provider: Some("stub".to_string()),
        backoff_secs: Some(vec![0]),
        verbose: Some(true),
        ..CliArgs::default()
    };
    let from_cli = Config::discover_with(temp.path(), None, &cli_args).unwrap();
    assert_eq!(from_cli.provider(), "stub");
    assert_eq!(source(&from_cli, "llm_provider"), "cli");
    assert_eq!(from_cli.backoff(), vec![Duration::ZERO]);
    assert!(from_cli.verbose());
    assert_eq!(source(&from_cli, "retry_backoff_secs"), "cli");
    assert_eq!(source(&from_cli, "verbose"), "cli");
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    for body in [
        "[llm]\nprovider = \"telepathy\"\n",
        "[retry]\nbackoff_secs = [601]\n",
        "[project]\nmin_capacity_tpa = 0\n",
        "[llm.stub]\nfailure = \"meltdown\"\n",
        "this is not toml",
    ] {
        write_config(temp.path(), body);
        let result = Config::discover_with(temp.path(), None, &CliArgs::default());
        assert!(result.is_err(), "accepted invalid config: {body}");
    }
}

#[test]
#[serial]
fn explicit_path_wins_over_discovery() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    write_config(temp.path(), "[llm]\nprovider = \"gemini\"\n");
    let explicit = temp.path().join("offline.toml");
    fs::write(&explicit, "[llm]\nprovider = \"stub\"\n").unwrap();
    unsafe { std::env::remove_var("CHEMPILOT_PROVIDER") };

    let cli_args = CliArgs {
        config_path: Some(explicit),
        ..CliArgs::default()
    };
    let config = Config::discover_with(temp.path(), None, &cli_args).unwrap();

    assert_eq!(config.provider(), "stub");
}
