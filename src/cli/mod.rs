//! Command-line interface for chempilot
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions (clap)
//! - `run`: entry point and command dispatch
//! - `commands`: command implementations and output rendering

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands};
pub use run::run;
