//! Phase registry for chempilot audits
//!
//! The registry is an immutable, ordered catalog of the eight industrial
//! project phases. Indices are 0-based and stable; the workflow state machine
//! stores only the index and looks metadata up here.
//!
//! | idx | id | tier | price (INR) |
//! |-----|----|------|-------------|
//! | 0 | `feasibility` | Free | 0 |
//! | 1 | `research` | Free | 0 |
//! | 2 | `design` | Paid | 25,000 |
//! | 3 | `feed` | Paid | 50,000 |
//! | 4 | `detailed_engineering` | Paid | 75,000 |
//! | 5 | `procurement` | Paid | 40,000 |
//! | 6 | `commissioning` | Paid | 30,000 |
//! | 7 | `operations` | Paid | 20,000 |

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use chempilot_utils::error::PhaseIndexError;

/// Identifier of a registry phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    /// Techno-economic feasibility: demand, scale and headline economics.
    Feasibility,
    /// R&D and process route selection.
    Research,
    /// Process design: flowsheet, mass and energy balance.
    Design,
    /// Front-end engineering design.
    Feed,
    DetailedEngineering,
    /// Equipment procurement and vendor selection.
    Procurement,
    Commissioning,
    /// Steady-state operations and optimisation.
    Operations,
}

impl PhaseId {
    /// Canonical lowercase name used in CLI commands and JSON output.
    ///
    /// ```rust
    /// use chempilot_phases::PhaseId;
    ///
    /// assert_eq!(PhaseId::Feed.as_str(), "feed");
    /// assert_eq!(PhaseId::DetailedEngineering.as_str(), "detailed_engineering");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feasibility => "feasibility",
            Self::Research => "research",
            Self::Design => "design",
            Self::Feed => "feed",
            Self::DetailedEngineering => "detailed_engineering",
            Self::Procurement => "procurement",
            Self::Commissioning => "commissioning",
            Self::Operations => "operations",
        }
    }

    /// Registry index of this phase.
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseId {
    type Err = String;

    /// Accepts the canonical id, a hyphenated variant, or a 0-based index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        if let Ok(index) = normalized.parse::<usize>() {
            return phase_at(index).map(|meta| meta.id).map_err(|e| e.to_string());
        }
        PHASES
            .iter()
            .find(|meta| meta.id.as_str() == normalized)
            .map(|meta| meta.id)
            .ok_or_else(|| {
                format!(
                    "Unknown phase '{s}'. Valid phases: {}",
                    PHASES
                        .iter()
                        .map(|meta| meta.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Whether a phase is free or behind a payment gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Free,
    Paid,
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "Free"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

/// What a vendor may see of a phase report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorAccess {
    /// No financial detail; the report is shown as-is.
    Full,
    /// Financial detail is redacted before display.
    Masked,
    /// Feasibility or financial detail; vendors may not view it.
    Denied,
}

/// Static description of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseMeta {
    pub index: usize,
    pub id: PhaseId,
    pub name: &'static str,
    pub tier: AccessTier,
    /// Price in rupees; 0 for free phases.
    pub price: u64,
    pub financial_detail: bool,
    pub vendor_access: VendorAccess,
    /// Scope of the generated report, fed to the prompt template.
    pub focus: &'static str,
}

impl PhaseMeta {
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self.tier, AccessTier::Paid)
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.index + 1 == PHASE_COUNT
    }
}

const PHASE_COUNT: usize = 8;

static PHASES: [PhaseMeta; PHASE_COUNT] = [
    PhaseMeta {
        index: 0,
        id: PhaseId::Feasibility,
        name: "Techno-Economic Feasibility",
        tier: AccessTier::Free,
        price: 0,
        financial_detail: true,
        vendor_access: VendorAccess::Denied,
        focus: "market demand, minimum economic scale, capital and operating cost estimates, projected IRR and payback",
    },
    PhaseMeta {
        index: 1,
        id: PhaseId::Research,
        name: "R&D and Process Selection",
        tier: AccessTier::Free,
        price: 0,
        financial_detail: false,
        vendor_access: VendorAccess::Full,
        focus: "candidate process routes, catalysts, licensors and the recommended route with its technical risks",
    },
    PhaseMeta {
        index: 2,
        id: PhaseId::Design,
        name: "Process Design",
        tier: AccessTier::Paid,
        price: 25_000,
        financial_detail: false,
        vendor_access: VendorAccess::Full,
        focus: "process flow description, mass and energy balance, key operating conditions and utility summary",
    },
    PhaseMeta {
        index: 3,
        id: PhaseId::Feed,
        name: "Front-End Engineering Design (FEED)",
        tier: AccessTier::Paid,
        price: 50_000,
        financial_detail: true,
        vendor_access: VendorAccess::Denied,
        focus: "plot plan, equipment list, preliminary P&IDs, +/-15% cost estimate and execution schedule",
    },
    PhaseMeta {
        index: 4,
        id: PhaseId::DetailedEngineering,
        name: "Detailed Engineering",
        tier: AccessTier::Paid,
        price: 75_000,
        financial_detail: false,
        vendor_access: VendorAccess::Full,
        focus: "equipment datasheets, piping and instrumentation detail, civil and electrical scope, HAZOP actions",
    },
    PhaseMeta {
        index: 5,
        id: PhaseId::Procurement,
        name: "Procurement",
        tier: AccessTier::Paid,
        price: 40_000,
        financial_detail: true,
        vendor_access: VendorAccess::Masked,
        focus: "long-lead items, vendor shortlist by package, budgetary quotes and logistics to site",
    },
    PhaseMeta {
        index: 6,
        id: PhaseId::Commissioning,
        name: "Commissioning",
        tier: AccessTier::Paid,
        price: 30_000,
        financial_detail: false,
        vendor_access: VendorAccess::Full,
        focus: "pre-commissioning checks, start-up sequence, performance guarantee test run and statutory approvals",
    },
    PhaseMeta {
        index: 7,
        id: PhaseId::Operations,
        name: "Operations and Optimisation",
        tier: AccessTier::Paid,
        price: 20_000,
        financial_detail: true,
        vendor_access: VendorAccess::Denied,
        focus: "steady-state KPIs, energy optimisation, debottlenecking options and their margin impact",
    },
];

/// Metadata for the phase at `index`.
///
/// # Errors
///
/// Returns `PhaseIndexError` when `index >= phase_count()`.
pub fn phase_at(index: usize) -> Result<&'static PhaseMeta, PhaseIndexError> {
    PHASES.get(index).ok_or(PhaseIndexError {
        index,
        count: PHASES.len(),
    })
}

#[must_use]
pub const fn phase_count() -> usize {
    PHASE_COUNT
}

/// Look a phase up by its id string (see [`PhaseId::from_str`]).
#[must_use]
pub fn phase_by_id(id: &str) -> Option<&'static PhaseMeta> {
    id.parse::<PhaseId>().ok().map(|id| &PHASES[id.index()])
}

/// All phases in order.
pub fn iter() -> impl Iterator<Item = &'static PhaseMeta> {
    PHASES.iter()
}
