use std::path::PathBuf;

/// CLI arguments for configuration override
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub provider: Option<String>,
    pub backoff_secs: Option<Vec<u64>>,
    pub verbose: Option<bool>,
}
