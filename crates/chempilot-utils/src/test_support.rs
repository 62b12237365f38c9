//! Fixtures shared by unit and integration tests.

use crate::types::ProjectInputs;

/// Check whether tests against the real generation service should run.
///
/// `CHEMPILOT_SKIP_LLM_TESTS=1` always disables them.
/// `CHEMPILOT_REAL_LLM_TESTS=1` enables them.
#[must_use]
pub fn llm_tests_enabled() -> bool {
    let skip = std::env::var("CHEMPILOT_SKIP_LLM_TESTS")
        .ok()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if skip {
        return false;
    }

    std::env::var("CHEMPILOT_REAL_LLM_TESTS")
        .ok()
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// A valid methanol project used throughout the test suites.
#[must_use]
pub fn sample_inputs() -> ProjectInputs {
    ProjectInputs::new("Methanol (67-56-1)", 100_000, "Dahej, Gujarat", 5_000_000)
}

/// A second valid project, distinct from [`sample_inputs`].
#[must_use]
pub fn alternate_inputs() -> ProjectInputs {
    ProjectInputs::new("Acetic Acid", 250_000, "Jamnagar, Gujarat", 12_000_000)
}

/// A key-shaped string that the redactor must never let through.
#[must_use]
pub fn fake_api_key() -> String {
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut key = String::from("AIza");
    let mut idx = 3;
    for _ in 0..35 {
        key.push(alphabet[idx] as char);
        idx = (idx + 7) % alphabet.len();
    }
    key
}
