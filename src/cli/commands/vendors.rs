//! `chempilot vendors`

use chempilot_engine::{match_vendors, vendors};
use chempilot_utils::{ChemPilotError, ExitCode};

use super::json_emit::emit_json;
use super::render;

pub fn execute_vendors_command(
    location: Option<&str>,
    json: bool,
) -> Result<ExitCode, ChemPilotError> {
    let listed = match location {
        Some(location) => match_vendors(location),
        None => vendors().iter().collect(),
    };

    if json {
        println!("{}", emit_json(&listed)?);
    } else {
        println!("Registered vendor marketplace");
        print!("{}", render::vendor_table(&listed));
    }
    Ok(ExitCode::SUCCESS)
}
