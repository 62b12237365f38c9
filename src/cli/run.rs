//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, builds the tokio
//! runtime and dispatches to the command handlers. It owns all error output;
//! `main` only converts the returned code into a process exit.

use clap::Parser;
use tracing::warn;

use chempilot_utils::ChemPilotError;
use chempilot_utils::logging::init_tracing;
use chempilot_utils::redaction::redact_error_message;

use super::args::{Cli, Commands};
use super::commands::{self, RunRequest};
use crate::{CliArgs, Config, ExitCode, ProjectInputs};

/// Main CLI execution function.
///
/// Returns `Ok(())` on success, or the exit code to terminate with after the
/// error has been printed.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        provider: cli.provider.clone(),
        backoff_secs: cli.backoff.clone(),
        verbose: cli.verbose.then_some(true),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            report_config_error(&err);
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(err) = init_tracing(config.verbose()) {
        // A subscriber installed by an embedding process is not fatal.
        eprintln!("warning: tracing not initialized: {err}");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.command.operation();

    let result: Result<ExitCode, ChemPilotError> = rt.block_on(async {
        match cli.command {
            Commands::Phases { json } => commands::execute_phases_command(json),
            Commands::Vendors { location, json } => {
                commands::execute_vendors_command(location.as_deref(), json)
            }
            Commands::Run {
                chemical,
                capacity,
                location,
                budget,
                role,
                through,
                paid,
                sign,
                json,
            } => {
                let request = RunRequest {
                    inputs: ProjectInputs::new(chemical, capacity, location, budget),
                    role,
                    through,
                    paid,
                    sign,
                    json,
                };
                commands::execute_run_command(request, &config).await
            }
            Commands::Session { role } => commands::execute_session_command(role, &config).await,
            Commands::Config { json } => commands::execute_config_command(&config, json),
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(err) => {
            warn!(operation, error = %err, "Command failed");
            eprint!("{}", err.display_for_user());
            Err(err.to_exit_code())
        }
    }
}

fn report_config_error(err: &anyhow::Error) {
    eprintln!("{}", redact_error_message(&format!("Error: {err:#}")));
    eprintln!("\n  Suggestions:");
    eprintln!("    - Check the file passed with --config or .chempilot/config.toml");
    eprintln!("    - Run `chempilot config` to see the effective values");
}
