//! Masked report view for vendors.

use once_cell::sync::Lazy;
use regex::Regex;

/// Text substituted for every withheld line.
pub const MASK_PLACEHOLDER: &str = "[financial detail withheld]";

/// Lines carrying monetary figures or financial metrics.
static FINANCIAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(₹|\$|€|\bINR\b|\bUSD\b|\bRs\.?\s*\d|\bcrores?\b|\blakhs?\b|\bIRR\b|\bNPV\b|\bcapex\b|\bopex\b|\bmargin\b|\bpayback\b|\bprice\b|\bcost\b|\bquotes?\b)",
    )
    .expect("Failed to create financial line regex")
});

/// Replace every line that mentions money with [`MASK_PLACEHOLDER`].
///
/// Consecutive withheld lines collapse into one placeholder.
///
/// ```rust
/// use chempilot_gate::{MASK_PLACEHOLDER, mask_financials};
///
/// let text = "Reactor: 2 x CSTR\nBudgetary quote: INR 4.2 crore";
/// assert_eq!(mask_financials(text), format!("Reactor: 2 x CSTR\n{MASK_PLACEHOLDER}"));
/// ```
#[must_use]
pub fn mask_financials(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        if FINANCIAL_LINE.is_match(line) {
            if out.last() != Some(&MASK_PLACEHOLDER) {
                out.push(MASK_PLACEHOLDER);
            }
        } else {
            out.push(line);
        }
    }
    out.join("\n")
}
