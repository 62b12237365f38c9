//! Workflow state machine
//!
//! [`AuditWorkflow`] owns the [`ProjectSession`] and is the only writer of its
//! phase index, reports and payments. Every transition returns an explicit
//! event or a typed error; an error never leaves the session half-updated.
//!
//! Indexing is 0-based and strictly gated:
//!
//! - `advance()` needs a `Ready` report at the current phase. A `Busy` slot
//!   (quota exhausted) blocks it like a missing report.
//! - The access controller is asked about the *target* phase.
//! - A signed and released phase cannot be executed again.

use chrono::Utc;
use serde::Serialize;
use std::time::Instant;
use tracing::{Instrument, info, warn};

use chempilot_gate::{Action, Visibility, decide, mask_financials, visibility};
use chempilot_llm::InvocationOutcome;
use chempilot_phases::{PhaseMeta, phase_at};
use chempilot_utils::cache::{CacheStats, ReportCache};
use chempilot_utils::error::WorkflowError;
use chempilot_utils::logging::{
    log_cache_stats, log_phase_complete, log_phase_error, log_phase_start, phase_span,
};
use chempilot_utils::types::{DenialReason, ProjectInputs, Role};

use crate::orchestrator::AuditOrchestrator;
use crate::session::{PhaseReport, ProjectSession, ReportSlot};
use crate::snapshot::WorkflowSnapshot;

/// Result of `execute_phase`.
///
/// Carries no report text; callers read it through `view_report`, which
/// applies the role's visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// A report is stored for the phase. `cached` is true when the
    /// generation service was not called.
    Completed {
        phase: usize,
        engine: String,
        cached: bool,
        attempts: u32,
    },
    /// The backoff schedule ran out; the phase slot is marked busy.
    Busy { phase: usize, attempts: u32 },
}

/// Result of `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// A report as the current role may see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub phase: usize,
    pub text: String,
    pub engine: String,
    pub visibility: Visibility,
    pub released: bool,
}

/// Result of `utility_load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UtilityOutcome {
    Ready { text: String },
    Busy { attempts: u32 },
}

pub struct AuditWorkflow {
    session: ProjectSession,
    orchestrator: AuditOrchestrator,
    cache: Option<ReportCache>,
    min_capacity_tpa: u64,
}

fn denied(reason: DenialReason) -> WorkflowError {
    WorkflowError::TransitionDenied { reason }
}

impl AuditWorkflow {
    #[must_use]
    pub fn new(orchestrator: AuditOrchestrator, min_capacity_tpa: u64) -> Self {
        Self {
            session: ProjectSession::default(),
            orchestrator,
            cache: Some(ReportCache::new()),
            min_capacity_tpa,
        }
    }

    /// Disable the report cache; every execution calls the service.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    #[must_use]
    pub const fn session(&self) -> &ProjectSession {
        &self.session
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .as_ref()
            .map(|cache| *cache.stats())
            .unwrap_or_default()
    }

    fn project_id(&self) -> String {
        self.session.project_id().to_string()
    }

    fn current_meta(&self) -> Result<&'static PhaseMeta, WorkflowError> {
        Ok(phase_at(self.session.current_phase)?)
    }

    /// Start a fresh project. The report cache survives.
    pub fn reset(&mut self, role: Role) {
        if let Some(cache) = &self.cache {
            log_cache_stats(cache.stats());
        }
        self.session = ProjectSession::new(role);
        info!(project_id = %self.session.project_id(), role = %role, "New project session");
    }

    /// Replace the project inputs wholesale.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInputs`; the session is unchanged.
    pub fn record_inputs(&mut self, inputs: ProjectInputs) -> Result<(), WorkflowError> {
        inputs.validate(self.min_capacity_tpa)?;
        info!(
            project_id = %self.session.project_id(),
            chemical = %inputs.chemical,
            capacity_tpa = inputs.capacity_tpa,
            "Project inputs recorded"
        );
        self.session.inputs = Some(inputs);
        Ok(())
    }

    pub fn set_role(&mut self, role: Role) {
        self.session.role = role;
    }

    /// Record an externally verified payment for `phase`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::PhaseIndex` for an unknown phase.
    pub fn confirm_payment(&mut self, phase: usize) -> Result<(), WorkflowError> {
        let meta = phase_at(phase)?;
        if self.session.payments.insert(phase) {
            info!(
                project_id = %self.session.project_id(),
                phase = meta.id.as_str(),
                "Payment confirmed"
            );
        }
        Ok(())
    }

    /// Generate the report for the current phase.
    ///
    /// # Errors
    ///
    /// - `InputsMissing` before `record_inputs`
    /// - `PhaseReleased` when the phase was signed and released
    /// - `TransitionDenied` when the role or payment state forbids execution
    /// - `NoEngineAvailable`, `GenerationFailed`, `Cancelled` from the
    ///   invoker; nothing is stored in those cases
    pub async fn execute_phase(&mut self) -> Result<ExecutionOutcome, WorkflowError> {
        let inputs = self
            .session
            .inputs
            .clone()
            .ok_or(WorkflowError::InputsMissing)?;
        let meta = self.current_meta()?;
        let index = meta.index;

        if let Some(ReportSlot::Ready(report)) = self.session.report(index)
            && report.released
        {
            return Err(WorkflowError::PhaseReleased {
                phase: meta.name.to_string(),
            });
        }

        decide(
            self.session.role,
            Action::Execute,
            meta,
            self.session.is_paid(index),
        )
        .into_result()
        .map_err(denied)?;

        let project_id = self.project_id();
        let phase_name = meta.id.as_str();

        if let Some(cached) = self
            .cache
            .as_mut()
            .and_then(|cache| cache.get(index, &inputs))
        {
            let outcome = ExecutionOutcome::Completed {
                phase: index,
                engine: cached.engine.clone(),
                cached: true,
                attempts: 0,
            };
            self.session.reports.insert(
                index,
                ReportSlot::Ready(PhaseReport {
                    phase: index,
                    text: cached.text,
                    engine: cached.engine,
                    generated_at: Utc::now(),
                    cached: true,
                    released: false,
                }),
            );
            info!(project_id = %project_id, phase = phase_name, "Report served from cache");
            return Ok(outcome);
        }

        log_phase_start(&project_id, phase_name);
        let started = Instant::now();
        let result = self
            .orchestrator
            .run_phase(meta, &inputs)
            .instrument(phase_span(&project_id, phase_name))
            .await;
        let elapsed_ms = started.elapsed().as_millis();

        match result {
            Ok(InvocationOutcome::Completed {
                text,
                engine,
                attempts,
            }) => {
                if let Some(cache) = self.cache.as_mut() {
                    cache.insert(index, &inputs, text.clone(), engine.clone());
                }
                let outcome = ExecutionOutcome::Completed {
                    phase: index,
                    engine: engine.clone(),
                    cached: false,
                    attempts,
                };
                self.session.reports.insert(
                    index,
                    ReportSlot::Ready(PhaseReport {
                        phase: index,
                        text,
                        engine,
                        generated_at: Utc::now(),
                        cached: false,
                        released: false,
                    }),
                );
                log_phase_complete(&project_id, phase_name, elapsed_ms);
                Ok(outcome)
            }
            Ok(InvocationOutcome::QuotaExceeded { attempts }) => {
                self.session.reports.insert(
                    index,
                    ReportSlot::Busy {
                        attempts,
                        recorded_at: Utc::now(),
                    },
                );
                warn!(
                    project_id = %project_id,
                    phase = phase_name,
                    attempts,
                    "Generation service busy, phase marked busy"
                );
                Ok(ExecutionOutcome::Busy {
                    phase: index,
                    attempts,
                })
            }
            Err(err) => {
                log_phase_error(&project_id, phase_name, &err.to_string(), elapsed_ms);
                Err(err.into())
            }
        }
    }

    /// Move to the next phase.
    ///
    /// # Errors
    ///
    /// - `AlreadyComplete` at the last phase
    /// - `TransitionDenied` with `ReportMissing`/`ReportBusy` when the current
    ///   phase has no real report
    /// - `TransitionDenied` when the target phase is not permitted
    pub fn advance(&mut self) -> Result<Transition, WorkflowError> {
        let current = self.current_meta()?;
        if current.is_last() {
            return Err(WorkflowError::AlreadyComplete {
                phase: current.name.to_string(),
            });
        }

        match self.session.report(current.index) {
            Some(ReportSlot::Ready(_)) => {}
            Some(ReportSlot::Busy { .. }) => {
                return Err(denied(DenialReason::ReportBusy {
                    phase: current.name.to_string(),
                }));
            }
            None => {
                return Err(denied(DenialReason::ReportMissing {
                    phase: current.name.to_string(),
                }));
            }
        }

        let target = phase_at(current.index + 1)?;
        decide(
            self.session.role,
            Action::Advance,
            target,
            self.session.is_paid(target.index),
        )
        .into_result()
        .map_err(denied)?;

        self.session.current_phase = target.index;
        info!(
            project_id = %self.session.project_id(),
            from = current.id.as_str(),
            to = target.id.as_str(),
            "Advanced phase"
        );
        Ok(Transition {
            from: current.index,
            to: target.index,
        })
    }

    /// Read the report of `phase` as the current role may see it.
    ///
    /// # Errors
    ///
    /// - `PhaseIndex` for an unknown phase
    /// - `TransitionDenied` when viewing is not permitted, or the phase has no
    ///   real report
    pub fn view_report(&self, phase: usize) -> Result<ReportView, WorkflowError> {
        let meta = phase_at(phase)?;
        let role = self.session.role;

        decide(role, Action::View, meta, self.session.is_paid(phase))
            .into_result()
            .map_err(denied)?;

        let report = match self.session.report(phase) {
            Some(ReportSlot::Ready(report)) => report,
            Some(ReportSlot::Busy { .. }) => {
                return Err(denied(DenialReason::ReportBusy {
                    phase: meta.name.to_string(),
                }));
            }
            None => {
                return Err(denied(DenialReason::ReportMissing {
                    phase: meta.name.to_string(),
                }));
            }
        };

        let visibility = visibility(role, meta);
        let text = match visibility {
            Visibility::Full => report.text.clone(),
            Visibility::Masked => mask_financials(&report.text),
        };

        Ok(ReportView {
            phase,
            text,
            engine: report.engine.clone(),
            visibility,
            released: report.released,
        })
    }

    /// Finalize the current phase's report and return it as released.
    ///
    /// # Errors
    ///
    /// - `TransitionDenied` with `InsufficientRole` unless the role is `SuperUser`
    /// - `TransitionDenied` when the current phase has no real report
    /// - `PhaseReleased` when it was already released
    pub fn sign_and_release(&mut self) -> Result<ReportView, WorkflowError> {
        let meta = self.current_meta()?;
        decide(
            self.session.role,
            Action::SignAndRelease,
            meta,
            self.session.is_paid(meta.index),
        )
        .into_result()
        .map_err(denied)?;

        let report = match self.session.reports.get_mut(&meta.index) {
            Some(ReportSlot::Ready(report)) => report,
            Some(ReportSlot::Busy { .. }) => {
                return Err(denied(DenialReason::ReportBusy {
                    phase: meta.name.to_string(),
                }));
            }
            None => {
                return Err(denied(DenialReason::ReportMissing {
                    phase: meta.name.to_string(),
                }));
            }
        };
        if report.released {
            return Err(WorkflowError::PhaseReleased {
                phase: meta.name.to_string(),
            });
        }

        report.released = true;
        let view = ReportView {
            phase: meta.index,
            text: report.text.clone(),
            engine: report.engine.clone(),
            visibility: Visibility::Full,
            released: true,
        };
        info!(
            project_id = %self.session.project_id,
            phase = meta.id.as_str(),
            "Phase signed and released"
        );
        Ok(view)
    }

    /// Estimate hourly steam, power and water consumption.
    ///
    /// The result is kept apart from the phase reports.
    ///
    /// # Errors
    ///
    /// - `InputsMissing` before `record_inputs`
    /// - `ProjectNotInitialized` until some phase holds a real report
    /// - `NoEngineAvailable`, `GenerationFailed`, `Cancelled` from the invoker
    pub async fn utility_load(&mut self) -> Result<UtilityOutcome, WorkflowError> {
        let inputs = self
            .session
            .inputs
            .clone()
            .ok_or(WorkflowError::InputsMissing)?;
        if !self.session.has_ready_report() {
            return Err(WorkflowError::ProjectNotInitialized);
        }

        let project_id = self.project_id();
        let started = Instant::now();
        let result = self
            .orchestrator
            .run_utility(&inputs)
            .instrument(phase_span(&project_id, "utility_load"))
            .await;

        match result {
            Ok(InvocationOutcome::Completed { text, .. }) => {
                log_phase_complete(&project_id, "utility_load", started.elapsed().as_millis());
                self.session.utility_load = Some(text.clone());
                Ok(UtilityOutcome::Ready { text })
            }
            Ok(InvocationOutcome::QuotaExceeded { attempts }) => {
                warn!(project_id = %project_id, attempts, "Utility sizing busy");
                Ok(UtilityOutcome::Busy { attempts })
            }
            Err(err) => {
                log_phase_error(
                    &project_id,
                    "utility_load",
                    &err.to_string(),
                    started.elapsed().as_millis(),
                );
                Err(err.into())
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot::capture(&self.session, self.orchestrator.provider(), self.cache_stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempilot_llm::testing::ScriptedService;
    use chempilot_llm::{LlmError, ResilientInvoker};
    use chempilot_utils::test_support::{alternate_inputs, sample_inputs};
    use std::sync::Arc;
    use std::time::Duration;

    fn workflow_with(service: &Arc<ScriptedService>, backoff: Vec<Duration>) -> AuditWorkflow {
        let invoker = ResilientInvoker::new(service.clone(), backoff);
        AuditWorkflow::new(AuditOrchestrator::new(invoker), 1_000)
    }

    fn workflow(service: &Arc<ScriptedService>) -> AuditWorkflow {
        workflow_with(service, vec![Duration::from_secs(1)])
    }

    async fn ready_workflow(service: &Arc<ScriptedService>) -> AuditWorkflow {
        let mut wf = workflow(service);
        wf.record_inputs(sample_inputs()).unwrap();
        wf.execute_phase().await.unwrap();
        wf
    }

    #[tokio::test]
    async fn test_execute_requires_inputs() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = workflow(&service);
        assert_eq!(wf.execute_phase().await, Err(WorkflowError::InputsMissing));
        assert_eq!(service.generate_calls(), 0);
    }

    #[test]
    fn test_invalid_inputs_leave_session_unchanged() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = workflow(&service);
        wf.record_inputs(sample_inputs()).unwrap();

        let err = wf
            .record_inputs(ProjectInputs::new("Methanol", 10, "Dahej", 1))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvalidInputs { ref field, .. } if field == "capacity"
        ));
        assert_eq!(wf.session().inputs(), Some(&sample_inputs()));
    }

    #[tokio::test]
    async fn test_successful_execution_stores_ready_report() {
        let service = Arc::new(ScriptedService::default().respond(Ok("feasible at scale".into())));
        let wf = ready_workflow(&service).await;

        let slot = wf.session().report(0).unwrap();
        assert_eq!(slot.report().unwrap().text, "feasible at scale");
        assert_eq!(wf.session().current_phase(), 0);
        assert_eq!(service.generate_calls(), 1);
    }

    #[tokio::test]
    async fn test_advance_without_report_is_denied() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = workflow(&service);
        let err = wf.advance().unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::TransitionDenied {
                reason: DenialReason::ReportMissing { .. }
            }
        ));
        assert_eq!(wf.session().current_phase(), 0);
    }

    #[tokio::test]
    async fn test_advance_through_free_phases() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;

        assert_eq!(wf.advance().unwrap(), Transition { from: 0, to: 1 });
        wf.execute_phase().await.unwrap();

        let err = wf.advance().unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::TransitionDenied {
                reason: DenialReason::PaymentRequired { price: 25_000, .. }
            }
        ));
        assert_eq!(wf.session().current_phase(), 1);

        wf.confirm_payment(2).unwrap();
        assert_eq!(wf.advance().unwrap(), Transition { from: 1, to: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_marks_slot_busy_and_blocks_advance() {
        let service = Arc::new(
            ScriptedService::default().always(Err(LlmError::RateLimited("429".into()))),
        );
        let mut wf = workflow_with(&service, vec![Duration::from_secs(1), Duration::from_secs(5)]);
        wf.record_inputs(sample_inputs()).unwrap();

        let outcome = wf.execute_phase().await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Busy { phase: 0, attempts: 3 });
        assert!(matches!(wf.session().report(0), Some(ReportSlot::Busy { attempts: 3, .. })));

        let err = wf.advance().unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::TransitionDenied {
                reason: DenialReason::ReportBusy { .. }
            }
        ));
        assert_eq!(wf.session().current_phase(), 0);
    }

    #[tokio::test]
    async fn test_fatal_failure_stores_nothing() {
        let service = Arc::new(
            ScriptedService::default().respond(Err(LlmError::Generation("safety block".into()))),
        );
        let mut wf = workflow(&service);
        wf.record_inputs(sample_inputs()).unwrap();

        let err = wf.execute_phase().await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::GenerationFailed(ref msg) if msg.contains("safety block")
        ));
        assert!(wf.session().report(0).is_none());
    }

    #[tokio::test]
    async fn test_offline_engine_stores_nothing() {
        let service = Arc::new(ScriptedService::offline());
        let mut wf = workflow(&service);
        wf.record_inputs(sample_inputs()).unwrap();

        assert!(matches!(
            wf.execute_phase().await,
            Err(WorkflowError::NoEngineAvailable(_))
        ));
        assert!(wf.session().reports().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_service() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;

        let outcome = wf.execute_phase().await.unwrap();
        assert!(matches!(
            outcome,
            ExecutionOutcome::Completed {
                cached: true,
                attempts: 0,
                ..
            }
        ));
        assert_eq!(service.generate_calls(), 1);
        assert_eq!(wf.cache_stats().hits, 1);

        wf.record_inputs(alternate_inputs()).unwrap();
        wf.execute_phase().await.unwrap();
        assert_eq!(service.generate_calls(), 2);
    }

    #[tokio::test]
    async fn test_without_cache_calls_service_each_time() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = workflow(&service).without_cache();
        wf.record_inputs(sample_inputs()).unwrap();
        wf.execute_phase().await.unwrap();
        wf.execute_phase().await.unwrap();
        assert_eq!(service.generate_calls(), 2);
        assert_eq!(wf.cache_stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_execute_paid_phase_requires_payment() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;
        wf.set_role(Role::SuperUser);
        wf.advance().unwrap();
        wf.execute_phase().await.unwrap();
        wf.advance().unwrap();

        wf.set_role(Role::Unprivileged);
        assert!(matches!(
            wf.execute_phase().await,
            Err(WorkflowError::TransitionDenied {
                reason: DenialReason::PaymentRequired { .. }
            })
        ));
    }

    #[tokio::test]
    async fn test_vendor_sees_masked_procurement() {
        let service = Arc::new(
            ScriptedService::default()
                .always(Ok("Column C-101: SS316\nBudgetary quote: INR 1.2 crore".into())),
        );
        let mut wf = ready_workflow(&service).await;
        wf.set_role(Role::SuperUser);
        for _ in 0..5 {
            wf.advance().unwrap();
            wf.execute_phase().await.unwrap();
        }
        assert_eq!(wf.session().current_phase(), 5);

        wf.set_role(Role::Vendor);
        wf.confirm_payment(5).unwrap();
        let view = wf.view_report(5).unwrap();
        assert_eq!(view.visibility, Visibility::Masked);
        assert!(view.text.contains("Column C-101"));
        assert!(!view.text.contains("crore"));

        let err = wf.view_report(0).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::TransitionDenied {
                reason: DenialReason::VendorRestriction { .. }
            }
        ));
    }

    #[tokio::test]
    async fn test_execute_outcome_carries_no_report_text() {
        let service = Arc::new(
            ScriptedService::default()
                .always(Ok("Projected IRR 24.1%, capex INR 300 crore".into())),
        );
        let mut wf = workflow(&service);
        wf.set_role(Role::Vendor);
        wf.record_inputs(sample_inputs()).unwrap();

        let outcome = wf.execute_phase().await.unwrap();
        let rendered = format!("{outcome:?} {}", serde_json::to_string(&outcome).unwrap());
        assert!(!rendered.contains("IRR"));
        assert!(!rendered.contains("300 crore"));
        assert!(matches!(
            outcome,
            ExecutionOutcome::Completed {
                phase: 0,
                cached: false,
                attempts: 1,
                ..
            }
        ));

        assert!(matches!(
            wf.view_report(0),
            Err(WorkflowError::TransitionDenied {
                reason: DenialReason::VendorRestriction { .. }
            })
        ));

        // Same inputs again: the cached outcome is just as opaque.
        let cached = wf.execute_phase().await.unwrap();
        assert!(!format!("{cached:?}").contains("IRR"));
    }

    #[tokio::test]
    async fn test_sign_and_release() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;

        let err = wf.sign_and_release().unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::TransitionDenied {
                reason: DenialReason::InsufficientRole {
                    required: Role::SuperUser,
                    ..
                }
            }
        ));

        wf.set_role(Role::SuperUser);
        let report = wf.sign_and_release().unwrap();
        assert!(report.released);
        assert_eq!(report.visibility, Visibility::Full);
        assert!(matches!(
            wf.sign_and_release(),
            Err(WorkflowError::PhaseReleased { .. })
        ));
        assert!(matches!(
            wf.execute_phase().await,
            Err(WorkflowError::PhaseReleased { .. })
        ));
        assert!(wf.view_report(0).unwrap().released);
    }

    #[tokio::test]
    async fn test_last_phase_is_already_complete() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;
        wf.set_role(Role::SuperUser);
        for _ in 0..7 {
            wf.advance().unwrap();
            wf.execute_phase().await.unwrap();
        }
        assert!(matches!(
            wf.advance(),
            Err(WorkflowError::AlreadyComplete { .. })
        ));
        assert_eq!(wf.session().current_phase(), 7);
    }

    #[tokio::test]
    async fn test_utility_load_needs_a_ready_report() {
        let service = Arc::new(ScriptedService::default().always(Ok("Steam: 42 TPH".into())));
        let mut wf = workflow(&service);
        wf.record_inputs(sample_inputs()).unwrap();
        assert_eq!(
            wf.utility_load().await,
            Err(WorkflowError::ProjectNotInitialized)
        );

        wf.execute_phase().await.unwrap();
        let outcome = wf.utility_load().await.unwrap();
        assert_eq!(
            outcome,
            UtilityOutcome::Ready {
                text: "Steam: 42 TPH".into()
            }
        );
        assert_eq!(wf.session().utility_load(), Some("Steam: 42 TPH"));
        assert_eq!(wf.session().reports().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_starts_new_project_and_keeps_cache() {
        let service = Arc::new(ScriptedService::default());
        let mut wf = ready_workflow(&service).await;
        let first = wf.session().project_id();

        wf.reset(Role::DomainReviewer);
        assert_ne!(wf.session().project_id(), first);
        assert!(wf.session().inputs().is_none());
        assert_eq!(wf.session().role(), Role::DomainReviewer);

        wf.record_inputs(sample_inputs()).unwrap();
        wf.execute_phase().await.unwrap();
        assert_eq!(service.generate_calls(), 1);
    }
}
