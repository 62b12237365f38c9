//! Serializable status view of a workflow.

use chrono::{DateTime, Utc};
use serde::Serialize;

use chempilot_phases::iter as phases;
use chempilot_utils::cache::CacheStats;
use chempilot_utils::types::{ProjectInputs, Role};

use crate::session::{ProjectSession, ReportSlot};

/// Per-phase status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseState {
    Pending,
    Busy,
    Ready,
    Released,
}

impl PhaseState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Busy => "busy",
            Self::Ready => "ready",
            Self::Released => "released",
        }
    }

    fn of(slot: Option<&ReportSlot>) -> Self {
        match slot {
            None => Self::Pending,
            Some(ReportSlot::Busy { .. }) => Self::Busy,
            Some(ReportSlot::Ready(report)) if report.released => Self::Released,
            Some(ReportSlot::Ready(_)) => Self::Ready,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseStatus {
    pub index: usize,
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    /// Payment verified, or nothing to pay.
    pub paid: bool,
    pub state: PhaseState,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub role: Role,
    pub current_phase: usize,
    pub current_phase_name: &'static str,
    pub inputs: Option<ProjectInputs>,
    pub phases: Vec<PhaseStatus>,
    pub utility_load_ready: bool,
    pub provider: String,
    pub cache: CacheStats,
}

impl WorkflowSnapshot {
    pub(crate) fn capture(session: &ProjectSession, provider: &str, cache: CacheStats) -> Self {
        let statuses: Vec<PhaseStatus> = phases()
            .map(|meta| PhaseStatus {
                index: meta.index,
                id: meta.id.as_str(),
                name: meta.name,
                price: meta.price,
                paid: !meta.is_paid() || session.is_paid(meta.index),
                state: PhaseState::of(session.report(meta.index)),
                current: meta.index == session.current_phase(),
            })
            .collect();

        let current_phase_name = statuses
            .get(session.current_phase())
            .map_or("", |status| status.name);

        Self {
            project_id: session.project_id().to_string(),
            created_at: session.created_at(),
            role: session.role(),
            current_phase: session.current_phase(),
            current_phase_name,
            inputs: session.inputs().cloned(),
            phases: statuses,
            utility_load_ready: session.utility_load().is_some(),
            provider: provider.to_string(),
            cache,
        }
    }

    /// Number of phases holding a real report.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.phases
            .iter()
            .filter(|p| matches!(p.state, PhaseState::Ready | PhaseState::Released))
            .count()
    }
}
