//! Project session data
//!
//! The session is plain owned data. Its fields are read through accessors;
//! only [`crate::AuditWorkflow`] mutates them. Report text stays inside the
//! crate: outside callers see it only through
//! [`crate::AuditWorkflow::view_report`].

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use chempilot_utils::types::{ProjectInputs, Role};

/// A generated phase report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: usize,
    pub text: String,
    /// Endpoint that produced the text.
    pub engine: String,
    pub generated_at: DateTime<Utc>,
    /// Served from the report cache instead of the generation service.
    pub cached: bool,
    /// Signed and released by a super-user; the phase can no longer be re-run.
    pub released: bool,
}

/// What is stored for a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSlot {
    Ready(PhaseReport),
    /// The last attempt ended with the backoff schedule exhausted.
    Busy {
        attempts: u32,
        recorded_at: DateTime<Utc>,
    },
}

impl ReportSlot {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub const fn report(&self) -> Option<&PhaseReport> {
        match self {
            Self::Ready(report) => Some(report),
            Self::Busy { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectSession {
    pub(crate) project_id: Uuid,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) current_phase: usize,
    pub(crate) inputs: Option<ProjectInputs>,
    pub(crate) reports: BTreeMap<usize, ReportSlot>,
    pub(crate) payments: BTreeSet<usize>,
    pub(crate) role: Role,
    pub(crate) utility_load: Option<String>,
}

impl ProjectSession {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            project_id: Uuid::new_v4(),
            created_at: Utc::now(),
            current_phase: 0,
            inputs: None,
            reports: BTreeMap::new(),
            payments: BTreeSet::new(),
            role,
            utility_load: None,
        }
    }

    #[must_use]
    pub const fn project_id(&self) -> Uuid {
        self.project_id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn current_phase(&self) -> usize {
        self.current_phase
    }

    #[must_use]
    pub const fn inputs(&self) -> Option<&ProjectInputs> {
        self.inputs.as_ref()
    }

    #[must_use]
    pub(crate) fn report(&self, phase: usize) -> Option<&ReportSlot> {
        self.reports.get(&phase)
    }

    #[must_use]
    pub(crate) const fn reports(&self) -> &BTreeMap<usize, ReportSlot> {
        &self.reports
    }

    #[must_use]
    pub fn is_paid(&self, phase: usize) -> bool {
        self.payments.contains(&phase)
    }

    #[must_use]
    pub const fn payments(&self) -> &BTreeSet<usize> {
        &self.payments
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn utility_load(&self) -> Option<&str> {
        self.utility_load.as_deref()
    }

    /// True once any phase holds a real report.
    #[must_use]
    pub fn has_ready_report(&self) -> bool {
        self.reports.values().any(ReportSlot::is_ready)
    }
}

impl Default for ProjectSession {
    fn default() -> Self {
        Self::new(Role::default())
    }
}
