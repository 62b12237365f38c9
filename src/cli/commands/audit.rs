//! `chempilot run`
//!
//! Execute, show, advance; repeat until the requested phase is done or a gate
//! refuses. A quota outcome stops the run with the busy exit code.

use serde_json::json;
use tracing::debug;

use chempilot_config::Config;
use chempilot_engine::{ExecutionOutcome, ReportView, SessionStore};
use chempilot_phases::{PhaseId, phase_at, phase_count};
use chempilot_utils::{ChemPilotError, ExitCode, ProjectInputs, Role, WorkflowError};

use super::json_emit::emit_json;
use super::render;

/// Arguments of one non-interactive run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub inputs: ProjectInputs,
    pub role: Role,
    pub through: Option<PhaseId>,
    pub paid: Vec<PhaseId>,
    pub sign: bool,
    pub json: bool,
}

/// What happened to one report once it was generated.
enum Shown {
    Visible(ReportView),
    Withheld { phase: usize, reason: String },
}

async fn show(store: &SessionStore, phase: usize) -> Result<Shown, ChemPilotError> {
    match store.view_report(phase).await {
        Ok(view) => Ok(Shown::Visible(view)),
        Err(WorkflowError::TransitionDenied { reason }) => Ok(Shown::Withheld {
            phase,
            reason: reason.to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

pub async fn execute_run_command(
    request: RunRequest,
    config: &Config,
) -> Result<ExitCode, ChemPilotError> {
    let store = SessionStore::from_config(config, request.role)?;
    store.record_inputs(request.inputs).await?;
    for phase in &request.paid {
        store.confirm_payment(phase.index()).await?;
    }

    let through = request
        .through
        .map_or(phase_count() - 1, |phase| phase.index());
    let mut shown: Vec<Shown> = Vec::new();
    let mut exit = ExitCode::SUCCESS;

    loop {
        let current = store.current_phase().await;
        match store.execute().await? {
            ExecutionOutcome::Completed {
                attempts, cached, ..
            } => {
                debug!(phase = current, attempts, cached, "Phase report ready");
                let entry = show(&store, current).await?;
                if !request.json {
                    print_shown(&entry);
                }
                shown.push(entry);
            }
            ExecutionOutcome::Busy { attempts, .. } => {
                if !request.json {
                    eprintln!("{}", render::busy("Phase execution", attempts));
                }
                exit = ExitCode::BUSY;
                break;
            }
        }

        if current >= through {
            break;
        }
        store.advance().await?;
    }

    if request.sign && exit == ExitCode::SUCCESS {
        let report = store.sign_and_release().await?;
        if !request.json {
            let name = phase_at(report.phase).map_or("Unknown phase", |meta| meta.name);
            println!("{name} signed and released.");
        }
    }

    let snapshot = store.snapshot().await;
    if request.json {
        let reports: Vec<_> = shown
            .iter()
            .map(|entry| match entry {
                Shown::Visible(view) => json!(view),
                Shown::Withheld { phase, reason } => json!({ "phase": phase, "withheld": reason }),
            })
            .collect();
        let output = json!({
            "outcome": if exit == ExitCode::BUSY { "busy" } else { "completed" },
            "status": snapshot,
            "reports": reports,
        });
        println!("{}", emit_json(&output)?);
    } else {
        println!("{}", render::snapshot(&snapshot));
    }

    Ok(exit)
}

fn print_shown(entry: &Shown) {
    match entry {
        Shown::Visible(view) => println!("{}", render::report(view)),
        Shown::Withheld { phase, reason } => {
            println!("=== Phase {} ===\n(report withheld: {reason})\n", phase + 1);
        }
    }
}
