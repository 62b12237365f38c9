//! Registered vendor marketplace.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vendor {
    pub company: &'static str,
    pub specialty: &'static str,
    pub region: &'static str,
}

static VENDORS: [Vendor; 3] = [
    Vendor {
        company: "Praj Industries",
        specialty: "Bio-Chemicals / Ethanol",
        region: "Pune / Pan-India",
    },
    Vendor {
        company: "Thermax",
        specialty: "Boilers & Utilities",
        region: "Gujarat / Maharashtra",
    },
    Vendor {
        company: "L&T Heavy Engineering",
        specialty: "Reactors & Columns",
        region: "Hazira",
    },
];

/// Every registered vendor, in registration order.
#[must_use]
pub fn vendors() -> &'static [Vendor] {
    &VENDORS
}

impl Vendor {
    /// True when any word of `location` appears in the vendor's region.
    fn serves(&self, location: &str) -> bool {
        let region = self.region.to_lowercase();
        location
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.len() > 2)
            .any(|word| region.contains(&word.to_lowercase()))
    }
}

/// Vendors ranked for a project location.
///
/// Vendors whose region mentions the location come first; the rest follow.
/// Registration order is kept within each group.
///
/// ```rust
/// use chempilot_engine::vendors::match_vendors;
///
/// let ranked = match_vendors("Dahej, Gujarat");
/// assert_eq!(ranked[0].company, "Thermax");
/// assert_eq!(ranked.len(), 3);
/// ```
#[must_use]
pub fn match_vendors(location: &str) -> Vec<&'static Vendor> {
    let (mut local, rest): (Vec<_>, Vec<_>) = VENDORS.iter().partition(|v| v.serves(location));
    local.extend(rest);
    local
}
