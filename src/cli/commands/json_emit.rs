//! JSON output for CLI commands.

use serde::Serialize;

use chempilot_utils::ChemPilotError;

/// Pretty JSON for stdout.
pub fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ChemPilotError> {
    serde_json::to_string_pretty(value).map_err(|e| ChemPilotError::Io(e.into()))
}
