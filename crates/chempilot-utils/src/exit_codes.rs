//! Exit code constants for chempilot.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `NOT_PERMITTED` | Role or payment gate refused the action |
//! | 65 | `INVALID_INPUT` | Project inputs missing or rejected |
//! | 69 | `ENGINE_OFFLINE` | No generation endpoint could be discovered |
//! | 70 | `GENERATION_FAILURE` | Generation service returned a fatal error |
//! | 75 | `BUSY` | Quota exhausted or an execution is in progress |

/// Exit codes matching the documented exit code table.
///
/// Use the named constants for common exit codes, or [`as_i32()`](Self::as_i32)
/// to get the numeric value for `std::process::exit()`.
///
/// ```rust
/// use chempilot_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::BUSY.as_i32(), 75);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Not permitted - access controller denied the action
    pub const NOT_PERMITTED: ExitCode = ExitCode(3);

    /// Invalid input - project inputs missing or outside the contract (EX_DATAERR)
    pub const INVALID_INPUT: ExitCode = ExitCode(65);

    /// Engine offline - discovery found no usable endpoint (EX_UNAVAILABLE)
    pub const ENGINE_OFFLINE: ExitCode = ExitCode(69);

    /// Generation failure - non-transient service error (EX_SOFTWARE)
    pub const GENERATION_FAILURE: ExitCode = ExitCode(70);

    /// Busy - quota exhausted after all retries (EX_TEMPFAIL)
    pub const BUSY: ExitCode = ExitCode(75);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    /// Short machine-readable name used in JSON error output.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self.0 {
            0 => "success",
            2 => "cli_args",
            3 => "not_permitted",
            65 => "invalid_input",
            69 => "engine_offline",
            70 => "generation_failure",
            75 => "busy",
            _ => "internal",
        }
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Exit statuses are truncated to a byte by the OS anyway.
        std::process::ExitCode::from(u8::try_from(code.0).unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values_are_stable() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 1);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::NOT_PERMITTED.as_i32(), 3);
        assert_eq!(ExitCode::INVALID_INPUT.as_i32(), 65);
        assert_eq!(ExitCode::ENGINE_OFFLINE.as_i32(), 69);
        assert_eq!(ExitCode::GENERATION_FAILURE.as_i32(), 70);
        assert_eq!(ExitCode::BUSY.as_i32(), 75);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ExitCode::BUSY.kind(), "busy");
        assert_eq!(ExitCode::NOT_PERMITTED.kind(), "not_permitted");
        assert_eq!(ExitCode::from_i32(42).kind(), "internal");
    }

    #[test]
    fn test_i32_conversions() {
        let code: ExitCode = 69.into();
        assert_eq!(code, ExitCode::ENGINE_OFFLINE);
        let raw: i32 = ExitCode::BUSY.into();
        assert_eq!(raw, 75);
    }
}
