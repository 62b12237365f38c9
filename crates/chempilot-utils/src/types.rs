use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkflowError;

/// Session role chosen by the user.
///
/// Roles are picked per session and never persisted beyond it. The set is
/// fixed:
///
/// ```text
/// Unprivileged (entrepreneur) | DomainReviewer (bank manager) | Vendor | SuperUser
/// ```
///
/// # Example
///
/// ```rust
/// use chempilot_utils::types::Role;
///
/// let role: Role = "bank-manager".parse().unwrap();
/// assert_eq!(role, Role::DomainReviewer);
/// assert_eq!(role.label(), "Bank Manager");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// The project owner with no special privileges.
    #[default]
    Unprivileged,
    /// Reviews audits on behalf of a lender or similar institution.
    DomainReviewer,
    /// Equipment supplier; financial detail is withheld from this role.
    Vendor,
    /// Bypasses payment and may sign and release phase output.
    SuperUser,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Role; 4] = [
        Role::Unprivileged,
        Role::DomainReviewer,
        Role::Vendor,
        Role::SuperUser,
    ];

    /// Canonical machine name used by the CLI and in JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unprivileged => "entrepreneur",
            Self::DomainReviewer => "bank-manager",
            Self::Vendor => "vendor",
            Self::SuperUser => "super-user",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unprivileged => "Entrepreneur",
            Self::DomainReviewer => "Bank Manager",
            Self::Vendor => "Vendor",
            Self::SuperUser => "Super-User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "entrepreneur" | "unprivileged" | "user" => Ok(Self::Unprivileged),
            "bank-manager" | "domain-reviewer" | "reviewer" => Ok(Self::DomainReviewer),
            "vendor" => Ok(Self::Vendor),
            "super-user" | "superuser" | "admin" => Ok(Self::SuperUser),
            other => Err(format!(
                "Unknown role '{other}'. Valid roles: entrepreneur, bank-manager, vendor, super-user"
            )),
        }
    }
}

/// The four project inputs shared by every phase.
///
/// Inputs are overwritten wholesale; there is no per-field update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectInputs {
    /// Chemical name or CAS number, opaque to the core.
    pub chemical: String,
    /// Production capacity in tonnes per annum.
    pub capacity_tpa: u64,
    /// Deployment hub.
    pub location: String,
    /// Budget in rupees.
    pub budget: u64,
}

impl ProjectInputs {
    #[must_use]
    pub fn new(
        chemical: impl Into<String>,
        capacity_tpa: u64,
        location: impl Into<String>,
        budget: u64,
    ) -> Self {
        Self {
            chemical: chemical.into(),
            capacity_tpa,
            location: location.into(),
            budget,
        }
    }

    /// Check the inputs against the surface contract.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInputs` naming the first offending field.
    pub fn validate(&self, min_capacity_tpa: u64) -> Result<(), WorkflowError> {
        if self.chemical.trim().is_empty() {
            return Err(WorkflowError::InvalidInputs {
                field: "chemical".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.capacity_tpa < min_capacity_tpa {
            return Err(WorkflowError::InvalidInputs {
                field: "capacity".to_string(),
                reason: format!("must be at least {min_capacity_tpa} TPA"),
            });
        }
        if self.location.trim().is_empty() {
            return Err(WorkflowError::InvalidInputs {
                field: "location".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.budget == 0 {
            return Err(WorkflowError::InvalidInputs {
                field: "budget".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Why the access controller refused an action.
///
/// Rendered verbatim to the user; denial is never silent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// Paid phase without verified payment.
    PaymentRequired { phase: String, price: u64 },
    /// Vendors may not read financial or feasibility detail.
    VendorRestriction { phase: String },
    /// The action needs a more privileged role.
    InsufficientRole { action: String, required: Role },
    /// No real report exists for the phase being left.
    ReportMissing { phase: String },
    /// The last attempt for the phase ended in quota exhaustion.
    ReportBusy { phase: String },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaymentRequired { phase, price } => write!(
                f,
                "payment required: '{phase}' is a paid phase (INR {})",
                format_inr(*price)
            ),
            Self::VendorRestriction { phase } => write!(
                f,
                "vendor restriction: '{phase}' contains feasibility or financial detail"
            ),
            Self::InsufficientRole { action, required } => {
                write!(f, "insufficient role: only {required} may {action}")
            }
            Self::ReportMissing { phase } => {
                write!(f, "report missing: '{phase}' has not been executed")
            }
            Self::ReportBusy { phase } => write!(
                f,
                "report unavailable: the last attempt for '{phase}' hit the service quota"
            ),
        }
    }
}

/// Configuration source for attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value taken from an environment variable.
    Env,
    /// Value loaded from a configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

/// Format a rupee amount with Indian digit grouping (e.g. `1,25,000`).
#[must_use]
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_aliases() {
        assert_eq!("Entrepreneur".parse::<Role>().unwrap(), Role::Unprivileged);
        assert_eq!("bank manager".parse::<Role>().unwrap(), Role::DomainReviewer);
        assert_eq!("VENDOR".parse::<Role>().unwrap(), Role::Vendor);
        assert_eq!("super_user".parse::<Role>().unwrap(), Role::SuperUser);
        assert!("auditor".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_round_trips_through_as_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_inputs_validation() {
        let inputs = ProjectInputs::new("Methanol", 100_000, "Dahej, Gujarat", 5_000_000);
        assert!(inputs.validate(1_000).is_ok());

        let mut small = inputs.clone();
        small.capacity_tpa = 10;
        match small.validate(1_000) {
            Err(WorkflowError::InvalidInputs { field, .. }) => assert_eq!(field, "capacity"),
            other => panic!("expected capacity error, got {other:?}"),
        }

        let mut blank = inputs.clone();
        blank.chemical = "   ".to_string();
        assert!(blank.validate(1_000).is_err());

        let mut broke = inputs;
        broke.budget = 0;
        assert!(broke.validate(1_000).is_err());
    }

    #[test]
    fn test_denial_reason_text() {
        let reason = DenialReason::PaymentRequired {
            phase: "Process Design".to_string(),
            price: 25_000,
        };
        assert!(reason.to_string().starts_with("payment required"));
        assert!(reason.to_string().contains("25,000"));

        let reason = DenialReason::InsufficientRole {
            action: "sign and release".to_string(),
            required: Role::SuperUser,
        };
        assert_eq!(
            reason.to_string(),
            "insufficient role: only Super-User may sign and release"
        );
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr(0), "0");
        assert_eq!(format_inr(999), "999");
        assert_eq!(format_inr(25_000), "25,000");
        assert_eq!(format_inr(125_000), "1,25,000");
        assert_eq!(format_inr(10_000_000), "1,00,00,000");
    }
}
