//! `chempilot config`

use std::collections::BTreeMap;

use chempilot_config::Config;
use chempilot_utils::{ChemPilotError, ExitCode};

use super::json_emit::emit_json;

#[derive(serde::Serialize)]
struct ConfigValue {
    value: String,
    source: String,
}

pub fn execute_config_command(config: &Config, json: bool) -> Result<ExitCode, ChemPilotError> {
    let effective: BTreeMap<String, ConfigValue> = config
        .effective_config()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigValue { value, source }))
        .collect();

    if json {
        println!("{}", emit_json(&effective)?);
    } else {
        for (key, entry) in &effective {
            println!("{key:<28} {:<52} ({})", entry.value, entry.source);
        }
    }
    Ok(ExitCode::SUCCESS)
}
