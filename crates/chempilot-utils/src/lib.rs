//! Foundation utilities shared by the chempilot crates.
//!
//! - [`error`]: error enums and user-facing rendering
//! - [`exit_codes`]: process exit codes
//! - [`types`]: roles, project inputs and denial reasons
//! - [`cache`]: BLAKE3-keyed report cache
//! - [`logging`]: tracing setup and phase log helpers
//! - [`redaction`]: credential scrubbing for messages

pub mod cache;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use error::{
    ChemPilotError, ConfigError, ErrorCategory, InvokeError, LlmError, PhaseIndexError,
    UserFriendlyError, WorkflowError,
};
pub use exit_codes::ExitCode;
pub use types::{ConfigSource, DenialReason, ProjectInputs, Role, format_inr};
