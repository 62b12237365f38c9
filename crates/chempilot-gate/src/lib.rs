//! Access control for chempilot phases
//!
//! [`decide`] is a pure function of role, action, phase and payment state.
//! Callers must render the denial reason; a denial is never silent.

pub mod access;
pub mod masking;

pub use access::{Action, Decision, Visibility, decide, visibility};
pub use masking::{MASK_PLACEHOLDER, mask_financials};
