//! chempilot - phase-gated industrial project audits
//!
//! A project moves through eight fixed phases, from techno-economic
//! feasibility to operations. Each phase report is produced by an external
//! text-generation service; moving to the next phase is gated on role and
//! verified payment.
//!
//! chempilot can be used in two ways:
//! - **CLI**: `chempilot run`, `chempilot session`, `chempilot phases`
//! - **Library**: drive a [`SessionStore`] directly
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Offline dry run through the two free phases
//! chempilot --provider stub run --chemical Methanol --capacity 100000 \
//!     --location "Dahej, Gujarat" --budget 5000000 --through research
//!
//! # Interactive session
//! chempilot session --role super-user
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use chempilot::{Config, ProjectInputs, Role, SessionStore};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SessionStore::from_config(&Config::minimal_for_testing(), Role::Unprivileged)?;
//! store
//!     .record_inputs(ProjectInputs::new("Methanol", 100_000, "Dahej, Gujarat", 5_000_000))
//!     .await?;
//! let outcome = store.execute().await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Exit Codes
//!
//! See [`ExitCode`]: 0 success, 2 configuration, 3 not permitted, 65 invalid
//! input, 69 engine offline, 70 generation failure, 75 busy.

pub mod cli;

pub use chempilot_config::{CliArgs, Config, ConfigBuilder};
pub use chempilot_engine::{
    AuditWorkflow, ExecutionOutcome, ReportView, SessionStore, Transition, UtilityOutcome,
    WorkflowSnapshot,
};
pub use chempilot_phases::{PhaseId, PhaseMeta};
pub use chempilot_utils::{ChemPilotError, ExitCode, ProjectInputs, Role, WorkflowError};
