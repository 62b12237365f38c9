//! `chempilot phases`

use chempilot_phases::iter as phases;
use chempilot_utils::{ChemPilotError, ExitCode};

use super::json_emit::emit_json;
use super::render;

pub fn execute_phases_command(json: bool) -> Result<ExitCode, ChemPilotError> {
    if json {
        let registry: Vec<_> = phases().collect();
        println!("{}", emit_json(&registry)?);
    } else {
        print!("{}", render::phase_table());
    }
    Ok(ExitCode::SUCCESS)
}
