//! Prompt construction for chempilot
//!
//! Prompts are pure template substitution over the phase metadata and the
//! project inputs. The same `(phase, inputs)` pair always yields the same
//! prompt string; no control logic lives here.

use chempilot_phases::{PhaseMeta, phase_count};
use chempilot_utils::types::{ProjectInputs, format_inr};

/// Shared project block included in every prompt.
fn project_block(inputs: &ProjectInputs) -> String {
    format!(
        "Project:\n\
         - Chemical: {chemical}\n\
         - Capacity: {capacity} TPA\n\
         - Location: {location}\n\
         - Budget: INR {budget}\n",
        chemical = inputs.chemical.trim(),
        capacity = format_inr(inputs.capacity_tpa),
        location = inputs.location.trim(),
        budget = format_inr(inputs.budget),
    )
}

/// Build the audit prompt for `phase`.
///
/// ```rust
/// use chempilot_phases::phase_at;
/// use chempilot_prompt_template::render_phase_prompt;
/// use chempilot_utils::types::ProjectInputs;
///
/// let inputs = ProjectInputs::new("Methanol", 100_000, "Dahej, Gujarat", 5_000_000);
/// let prompt = render_phase_prompt(phase_at(0).unwrap(), &inputs);
/// assert!(prompt.contains("Techno-Economic Feasibility"));
/// assert!(prompt.contains("1,00,000 TPA"));
/// ```
#[must_use]
pub fn render_phase_prompt(phase: &PhaseMeta, inputs: &ProjectInputs) -> String {
    format!(
        "You are a senior process engineer preparing an institutional audit for an Indian \
         chemical project.\n\n\
         {project}\n\
         Phase {number} of {total}: {name}\n\
         Cover: {focus}.\n\n\
         Use the Indian regulatory and logistics context for the location. \
         Structure the answer with short headed sections and state assumptions explicitly.",
        project = project_block(inputs),
        number = phase.index + 1,
        total = phase_count(),
        name = phase.name,
        focus = phase.focus,
    )
}

/// Build the utility sizing prompt.
#[must_use]
pub fn render_utility_prompt(inputs: &ProjectInputs) -> String {
    format!(
        "Calculate the hourly utility consumption for a {capacity} TPA {chemical} plant at \
         {location}: steam in TPH, power in MW and cooling/process water in m3/hr. \
         Give one line per utility followed by the main assumptions.",
        capacity = format_inr(inputs.capacity_tpa),
        chemical = inputs.chemical.trim(),
        location = inputs.location.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempilot_phases::{iter, phase_at};

    fn inputs() -> ProjectInputs {
        ProjectInputs::new("Methanol", 100_000, "Dahej, Gujarat", 5_000_000)
    }

    #[test]
    fn test_phase_prompt_is_deterministic() {
        let meta = phase_at(3).unwrap();
        assert_eq!(
            render_phase_prompt(meta, &inputs()),
            render_phase_prompt(meta, &inputs())
        );
    }

    #[test]
    fn test_phase_prompts_are_distinct_per_phase() {
        let prompts: Vec<String> = iter().map(|m| render_phase_prompt(m, &inputs())).collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_prompt_carries_all_inputs() {
        let prompt = render_phase_prompt(phase_at(0).unwrap(), &inputs());
        assert!(prompt.contains("Methanol"));
        assert!(prompt.contains("1,00,000 TPA"));
        assert!(prompt.contains("Dahej, Gujarat"));
        assert!(prompt.contains("INR 50,00,000"));
        assert!(prompt.contains(&format!("Phase 1 of {}", phase_count())));
    }

    #[test]
    fn test_utility_prompt() {
        let prompt = render_utility_prompt(&inputs());
        assert!(prompt.contains("steam in TPH"));
        assert!(prompt.contains("1,00,000 TPA Methanol"));
        assert!(prompt.contains("Dahej, Gujarat"));
    }
}
