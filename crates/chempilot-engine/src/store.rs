//! Session store
//!
//! Holds the single active workflow behind a `tokio::sync::Mutex`. Calls that
//! reach the generation service use `try_lock`, so a second execution while
//! one is in flight is rejected instead of queued.

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use chempilot_config::Config;
use chempilot_llm::{LlmError, invoker_from_config};
use chempilot_utils::error::WorkflowError;
use chempilot_utils::types::{ProjectInputs, Role};

use crate::orchestrator::AuditOrchestrator;
use crate::snapshot::WorkflowSnapshot;
use crate::workflow::{AuditWorkflow, ExecutionOutcome, ReportView, Transition, UtilityOutcome};

pub struct SessionStore {
    workflow: Mutex<AuditWorkflow>,
}

impl SessionStore {
    #[must_use]
    pub fn new(workflow: AuditWorkflow) -> Self {
        Self {
            workflow: Mutex::new(workflow),
        }
    }

    /// Build the generation stack and an empty session from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` when the provider cannot be built.
    pub fn from_config(config: &Config, role: Role) -> Result<Self, LlmError> {
        let orchestrator = AuditOrchestrator::new(invoker_from_config(config)?);
        let mut workflow = AuditWorkflow::new(orchestrator, config.min_capacity_tpa());
        if !config.cache_reports() {
            workflow = workflow.without_cache();
        }
        workflow.set_role(role);
        Ok(Self::new(workflow))
    }

    fn try_acquire(&self) -> Result<MutexGuard<'_, AuditWorkflow>, WorkflowError> {
        self.workflow.try_lock().map_err(|_| {
            debug!("Rejected overlapping execution");
            WorkflowError::ExecutionInProgress
        })
    }

    /// Discard the active project and start a new one. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionInProgress` while a generation call is running.
    pub fn new_project(&self, role: Role) -> Result<String, WorkflowError> {
        let mut workflow = self.try_acquire()?;
        workflow.reset(role);
        Ok(workflow.session().project_id().to_string())
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::execute_phase`]; additionally
    /// `ExecutionInProgress` when another execution holds the session.
    pub async fn execute(&self) -> Result<ExecutionOutcome, WorkflowError> {
        self.try_acquire()?.execute_phase().await
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::utility_load`]; additionally
    /// `ExecutionInProgress` when another execution holds the session.
    pub async fn utility_load(&self) -> Result<UtilityOutcome, WorkflowError> {
        self.try_acquire()?.utility_load().await
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::record_inputs`].
    pub async fn record_inputs(&self, inputs: ProjectInputs) -> Result<(), WorkflowError> {
        self.workflow.lock().await.record_inputs(inputs)
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::advance`].
    pub async fn advance(&self) -> Result<Transition, WorkflowError> {
        self.workflow.lock().await.advance()
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::confirm_payment`].
    pub async fn confirm_payment(&self, phase: usize) -> Result<(), WorkflowError> {
        self.workflow.lock().await.confirm_payment(phase)
    }

    pub async fn set_role(&self, role: Role) {
        self.workflow.lock().await.set_role(role);
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::view_report`].
    pub async fn view_report(&self, phase: usize) -> Result<ReportView, WorkflowError> {
        self.workflow.lock().await.view_report(phase)
    }

    /// # Errors
    ///
    /// See [`AuditWorkflow::sign_and_release`].
    pub async fn sign_and_release(&self) -> Result<ReportView, WorkflowError> {
        self.workflow.lock().await.sign_and_release()
    }

    pub async fn current_phase(&self) -> usize {
        self.workflow.lock().await.session().current_phase()
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.workflow.lock().await.snapshot()
    }
}
