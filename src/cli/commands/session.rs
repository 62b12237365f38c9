//! `chempilot session`
//!
//! Line-oriented interactive session. One command per line; errors are
//! printed and the session continues. EOF or `quit` ends it.

use tokio::io::{AsyncBufReadExt, BufReader};

use chempilot_config::Config;
use chempilot_engine::{ExecutionOutcome, SessionStore, UtilityOutcome, match_vendors, vendors};
use chempilot_phases::{PhaseId, phase_at};
use chempilot_utils::{ChemPilotError, ExitCode, ProjectInputs, Role};

use super::json_emit::emit_json;
use super::render;

const HELP: &str = "\
Commands:
  inputs <chemical>|<capacity TPA>|<location>|<budget INR>
  role <entrepreneur|bank-manager|vendor|super-user>
  pay <phase>          confirm payment for a phase (id or index)
  execute              generate the current phase report
  advance              move to the next phase
  view [phase]         show a report (default: current phase)
  sign                 sign and release the current phase (super-user)
  utilities            hourly steam, power and water estimate
  vendors              list the vendor marketplace
  request-quotes       send quote requests to matched vendors
  status [--json]      show the audit status
  new                  start a new project
  help                 show this help
  quit                 end the session";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Inputs(ProjectInputs),
    Role(Role),
    Pay(PhaseId),
    Execute,
    Advance,
    View(Option<PhaseId>),
    Sign,
    Utilities,
    Vendors,
    RequestQuotes,
    Status { json: bool },
    New,
    Help,
    Quit,
}

fn parse_amount(field: &str, value: &str) -> Result<u64, String> {
    value
        .trim()
        .replace([',', '_'], "")
        .parse::<u64>()
        .map_err(|_| format!("{field} must be a whole number, got '{}'", value.trim()))
}

fn parse_inputs(rest: &str) -> Result<ProjectInputs, String> {
    let fields: Vec<&str> = rest.split('|').collect();
    let [chemical, capacity, location, budget] = fields.as_slice() else {
        return Err(
            "usage: inputs <chemical>|<capacity TPA>|<location>|<budget INR>".to_string(),
        );
    };
    Ok(ProjectInputs::new(
        chemical.trim(),
        parse_amount("capacity", capacity)?,
        location.trim(),
        parse_amount("budget", budget)?,
    ))
}

impl SessionCommand {
    /// Parse one input line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let command = match verb.to_lowercase().as_str() {
            "inputs" => Self::Inputs(parse_inputs(rest)?),
            "role" => Self::Role(rest.parse()?),
            "pay" => Self::Pay(rest.parse()?),
            "execute" | "run" => Self::Execute,
            "advance" | "next" => Self::Advance,
            "view" if rest.is_empty() => Self::View(None),
            "view" => Self::View(Some(rest.parse()?)),
            "sign" => Self::Sign,
            "utilities" => Self::Utilities,
            "vendors" => Self::Vendors,
            "request-quotes" => Self::RequestQuotes,
            "status" => Self::Status {
                json: rest == "--json",
            },
            "new" => Self::New,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}' (type 'help')")),
        };
        Ok(Some(command))
    }
}

fn phase_label(index: usize) -> &'static str {
    phase_at(index).map_or("unknown phase", |meta| meta.id.as_str())
}

/// Apply one command. Returns `false` when the session should end.
async fn apply(store: &SessionStore, command: SessionCommand) -> Result<bool, ChemPilotError> {
    match command {
        SessionCommand::Inputs(inputs) => {
            store.record_inputs(inputs).await?;
            println!("Inputs recorded.");
        }
        SessionCommand::Role(role) => {
            store.set_role(role).await;
            println!("Role set to {role}.");
        }
        SessionCommand::Pay(phase) => {
            store.confirm_payment(phase.index()).await?;
            println!("Payment confirmed for {phase}.");
        }
        SessionCommand::Execute => match store.execute().await? {
            ExecutionOutcome::Completed { phase, .. } => match store.view_report(phase).await {
                Ok(view) => println!("{}", render::report(&view)),
                Err(err) => println!("Report stored for {}, but {err}", phase_label(phase)),
            },
            ExecutionOutcome::Busy { attempts, .. } => {
                println!("{}", render::busy("Phase execution", attempts));
            }
        },
        SessionCommand::Advance => {
            let transition = store.advance().await?;
            println!(
                "Advanced from {} to {}.",
                phase_label(transition.from),
                phase_label(transition.to)
            );
        }
        SessionCommand::View(phase) => {
            let index = match phase {
                Some(phase) => phase.index(),
                None => store.current_phase().await,
            };
            println!("{}", render::report(&store.view_report(index).await?));
        }
        SessionCommand::Sign => {
            let report = store.sign_and_release().await?;
            println!("{} signed and released.", phase_label(report.phase));
        }
        SessionCommand::Utilities => match store.utility_load().await? {
            UtilityOutcome::Ready { text } => println!("=== Utility load ===\n{text}\n"),
            UtilityOutcome::Busy { attempts } => {
                println!("{}", render::busy("Utility sizing", attempts));
            }
        },
        SessionCommand::Vendors => {
            print!("{}", render::vendor_table(&vendors().iter().collect::<Vec<_>>()));
        }
        SessionCommand::RequestQuotes => {
            let snapshot = store.snapshot().await;
            let location = snapshot
                .inputs
                .as_ref()
                .map_or("", |inputs| inputs.location.as_str());
            let matched = match_vendors(location);
            let names: Vec<&str> = matched.iter().map(|v| v.company).collect();
            println!(
                "Quote requests queued for {} verified vendors: {}",
                names.len(),
                names.join(", ")
            );
        }
        SessionCommand::Status { json } => {
            let snapshot = store.snapshot().await;
            if json {
                println!("{}", emit_json(&snapshot)?);
            } else {
                print!("{}", render::snapshot(&snapshot));
            }
        }
        SessionCommand::New => {
            let role = store.snapshot().await.role;
            let project_id = store.new_project(role)?;
            println!("New project {project_id}.");
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn execute_session_command(
    role: Role,
    config: &Config,
) -> Result<ExitCode, ChemPilotError> {
    let store = SessionStore::from_config(config, role)?;
    let snapshot = store.snapshot().await;
    println!(
        "chempilot session {} as {}. Type 'help' for commands.",
        snapshot.project_id, snapshot.role
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("Error: {message}");
                continue;
            }
        };
        match apply(&store, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("{}", err.display_for_user().trim_end()),
        }
    }

    Ok(ExitCode::SUCCESS)
}
