//! Plain-text rendering for CLI output.

use std::fmt::Write as _;

use chempilot_engine::{ReportView, Vendor, WorkflowSnapshot};
use chempilot_gate::Visibility;
use chempilot_phases::{AccessTier, iter as phases, phase_at};
use chempilot_utils::types::format_inr;

/// The registry as an aligned table.
pub fn phase_table() -> String {
    let mut out = String::from("  #  ID                    NAME                                 ACCESS\n");
    for meta in phases() {
        let access = match meta.tier {
            AccessTier::Free => "free".to_string(),
            AccessTier::Paid => format!("INR {}", format_inr(meta.price)),
        };
        let _ = writeln!(
            out,
            "  {:<2} {:<21} {:<36} {}",
            meta.index,
            meta.id.as_str(),
            meta.name,
            access
        );
    }
    out
}

pub fn vendor_table(vendors: &[&Vendor]) -> String {
    let mut out = format!("  {:<24} {:<26} {}\n", "COMPANY", "SPECIALTY", "REGION");
    for vendor in vendors {
        let _ = writeln!(
            out,
            "  {:<24} {:<26} {}",
            vendor.company, vendor.specialty, vendor.region
        );
    }
    out
}

pub fn report(view: &ReportView) -> String {
    let name = phase_at(view.phase).map_or("Unknown phase", |meta| meta.name);
    let mut out = format!("=== Phase {}: {} ===\n", view.phase + 1, name);
    if view.visibility == Visibility::Masked {
        out.push_str("(vendor view: financial detail withheld)\n");
    }
    if view.released {
        out.push_str("(signed and released)\n");
    }
    let _ = writeln!(out, "Engine: {}\n", view.engine);
    out.push_str(view.text.trim_end());
    out.push('\n');
    out
}

pub fn snapshot(snapshot: &WorkflowSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", snapshot.project_id);
    let _ = writeln!(out, "Role:    {}", snapshot.role);
    if let Some(inputs) = &snapshot.inputs {
        let _ = writeln!(
            out,
            "Scale:   {} TPA {} at {} (budget INR {})",
            format_inr(inputs.capacity_tpa),
            inputs.chemical,
            inputs.location,
            format_inr(inputs.budget)
        );
    } else {
        out.push_str("Scale:   no inputs recorded\n");
    }
    let _ = writeln!(
        out,
        "Phase:   {} of {} ({})",
        snapshot.current_phase + 1,
        snapshot.phases.len(),
        snapshot.current_phase_name
    );
    out.push('\n');
    for phase in &snapshot.phases {
        let marker = if phase.current { ">" } else { " " };
        let payment = if phase.paid { "" } else { "  [payment pending]" };
        let _ = writeln!(
            out,
            "{marker} {:<2} {:<36} {:<8}{payment}",
            phase.index,
            phase.name,
            phase.state.as_str()
        );
    }
    let _ = writeln!(
        out,
        "\nUtility load: {}",
        if snapshot.utility_load_ready {
            "calculated"
        } else {
            "not calculated"
        }
    );
    let _ = writeln!(
        out,
        "Provider: {} (cache hits {}, misses {})",
        snapshot.provider, snapshot.cache.hits, snapshot.cache.misses
    );
    out
}

/// Message for a quota-exhausted attempt.
pub fn busy(what: &str, attempts: u32) -> String {
    format!(
        "{what}: the generation service is busy after {attempts} attempt(s).\n\
         System busy, try again later."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempilot_engine::match_vendors;

    #[test]
    fn test_phase_table_lists_prices() {
        let table = phase_table();
        assert!(table.contains("feasibility"));
        assert!(table.contains("INR 25,000"));
        assert_eq!(table.lines().count(), 9);
    }

    #[test]
    fn test_vendor_table() {
        let table = vendor_table(&match_vendors("Gujarat"));
        assert!(table.lines().nth(1).unwrap().contains("Thermax"));
    }

    #[test]
    fn test_masked_report_is_flagged() {
        let view = ReportView {
            phase: 5,
            text: "Column\n[financial detail withheld]".into(),
            engine: "models/stub-flash".into(),
            visibility: Visibility::Masked,
            released: false,
        };
        let text = report(&view);
        assert!(text.starts_with("=== Phase 6: Procurement ==="));
        assert!(text.contains("vendor view"));
    }
}
