//! CLI command implementations.
//!
//! Each handler prints its own output and returns the exit code to use.
//! Typed errors are returned for `run.rs` to render.

mod audit;
mod config_cmd;
mod json_emit;
mod phases;
pub(crate) mod render;
pub(crate) mod session;
mod vendors;

pub use audit::{RunRequest, execute_run_command};
pub use config_cmd::execute_config_command;
pub use phases::execute_phases_command;
pub use session::execute_session_command;
pub use vendors::execute_vendors_command;
