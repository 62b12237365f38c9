//! Audit orchestrator
//!
//! Pure composition: build the prompt for `(phase, inputs)` and hand it to the
//! resilient invoker. The invoker's result is returned unchanged; gating,
//! retries and storage live elsewhere.

use chempilot_llm::{InvocationOutcome, InvokeError, ResilientInvoker};
use chempilot_phases::PhaseMeta;
use chempilot_prompt_template::{render_phase_prompt, render_utility_prompt};
use chempilot_utils::types::ProjectInputs;

pub struct AuditOrchestrator {
    invoker: ResilientInvoker,
}

impl AuditOrchestrator {
    #[must_use]
    pub fn new(invoker: ResilientInvoker) -> Self {
        Self { invoker }
    }

    #[must_use]
    pub fn provider(&self) -> &str {
        self.invoker.provider()
    }

    /// Generate the report for one phase.
    ///
    /// # Errors
    ///
    /// Propagates the invoker's fatal errors.
    pub async fn run_phase(
        &self,
        phase: &PhaseMeta,
        inputs: &ProjectInputs,
    ) -> Result<InvocationOutcome, InvokeError> {
        let prompt = render_phase_prompt(phase, inputs);
        self.invoker.invoke(&prompt).await
    }

    /// Generate the hourly utility consumption estimate.
    ///
    /// # Errors
    ///
    /// Propagates the invoker's fatal errors.
    pub async fn run_utility(
        &self,
        inputs: &ProjectInputs,
    ) -> Result<InvocationOutcome, InvokeError> {
        let prompt = render_utility_prompt(inputs);
        self.invoker.invoke(&prompt).await
    }
}
