//! Audit workflow engine for chempilot
//!
//! Wires the phase registry, access controller and resilient invoker into a
//! phase-gated workflow over one project session.
//!
//! # Architecture
//!
//! - **AuditWorkflow**: state machine; sole writer of the session
//! - **AuditOrchestrator**: prompt construction plus invoker delegation
//! - **SessionStore**: the single active workflow, one execution at a time
//! - **WorkflowSnapshot**: serializable status view
//!
//! # Example
//!
//! ```rust,no_run
//! use chempilot_config::Config;
//! use chempilot_engine::SessionStore;
//! use chempilot_utils::types::{ProjectInputs, Role};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SessionStore::from_config(&Config::minimal_for_testing(), Role::SuperUser)?;
//! store
//!     .record_inputs(ProjectInputs::new("Methanol", 100_000, "Dahej, Gujarat", 5_000_000))
//!     .await?;
//! store.execute().await?;
//! store.advance().await?;
//! println!("now at phase {}", store.current_phase().await);
//! # Ok(())
//! # }
//! ```

pub mod orchestrator;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod vendors;
pub mod workflow;

pub use orchestrator::AuditOrchestrator;
pub use session::{PhaseReport, ProjectSession, ReportSlot};
pub use snapshot::{PhaseState, PhaseStatus, WorkflowSnapshot};
pub use store::SessionStore;
pub use vendors::{Vendor, match_vendors, vendors};
pub use workflow::{AuditWorkflow, ExecutionOutcome, ReportView, Transition, UtilityOutcome};
