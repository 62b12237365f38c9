//! Access decisions
//!
//! Rules, applied in order:
//!
//! 1. Only `SuperUser` may sign and release.
//! 2. A `Vendor` may not view a phase with feasibility or financial detail,
//!    whatever the payment state. Procurement is the exception: vendors get
//!    a masked view.
//! 3. A `Paid` phase needs verified payment for that phase, unless the role
//!    is `SuperUser`.
//! 4. Everything else is allowed.

use serde::Serialize;
use std::fmt;

use chempilot_phases::{PhaseMeta, VendorAccess};
use chempilot_utils::types::{DenialReason, Role};

/// An action a session may attempt on a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read the stored report.
    View,
    /// Generate the report for the current phase.
    Execute,
    /// Move into the target phase.
    Advance,
    /// Finalize a phase's output.
    SignAndRelease,
}

impl Action {
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::View => "view reports",
            Self::Execute => "execute phases",
            Self::Advance => "advance phases",
            Self::SignAndRelease => "sign and release",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allowed,
    Denied { reason: DenialReason },
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Convert into a `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the denial reason when the decision is `Denied`.
    pub fn into_result(self) -> Result<(), DenialReason> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied { reason } => Err(reason),
        }
    }
}

/// How much of a report a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Full,
    /// Financial lines are redacted (see [`crate::mask_financials`]).
    Masked,
}

/// Decide whether `role` may perform `action` on `phase`.
///
/// `payment_verified` is the payment state of `phase` itself. For
/// [`Action::Advance`], pass the *target* phase.
#[must_use]
pub fn decide(role: Role, action: Action, phase: &PhaseMeta, payment_verified: bool) -> Decision {
    if action == Action::SignAndRelease {
        if role != Role::SuperUser {
            return Decision::Denied {
                reason: DenialReason::InsufficientRole {
                    action: action.describe().to_string(),
                    required: Role::SuperUser,
                },
            };
        }
        return Decision::Allowed;
    }

    if action == Action::View
        && role == Role::Vendor
        && phase.vendor_access == VendorAccess::Denied
    {
        return Decision::Denied {
            reason: DenialReason::VendorRestriction {
                phase: phase.name.to_string(),
            },
        };
    }

    if phase.is_paid() && !payment_verified && role != Role::SuperUser {
        return Decision::Denied {
            reason: DenialReason::PaymentRequired {
                phase: phase.name.to_string(),
                price: phase.price,
            },
        };
    }

    Decision::Allowed
}

/// Visibility of `phase` for `role`, assuming `decide` allowed the view.
#[must_use]
pub fn visibility(role: Role, phase: &PhaseMeta) -> Visibility {
    if role == Role::Vendor && phase.vendor_access == VendorAccess::Masked {
        Visibility::Masked
    } else {
        Visibility::Full
    }
}
