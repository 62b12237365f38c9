//! Logging and observability infrastructure for chempilot
//!
//! Structured logging via `tracing`. Log output goes to stderr so that JSON
//! written to stdout stays machine-readable.

use std::io::IsTerminal;
use tracing::{Level, error, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cache::CacheStats;
use crate::redaction::redact_error_message;

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Verbose mode adds targets and
/// span close events.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("chempilot=debug,info")
            } else {
                EnvFilter::try_new("chempilot=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span covering one phase execution.
pub fn phase_span(project_id: &str, phase: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "phase_execution",
        project_id = %project_id,
        phase = %phase,
    )
}

pub fn log_phase_start(project_id: &str, phase: &str) {
    info!(
        project_id = %project_id,
        phase = %phase,
        "Starting phase execution"
    );
}

pub fn log_phase_complete(project_id: &str, phase: &str, duration_ms: u128) {
    info!(
        project_id = %project_id,
        phase = %phase,
        duration_ms = %duration_ms,
        "Phase execution completed"
    );
}

/// Log phase failure. The error message is redacted first.
pub fn log_phase_error(project_id: &str, phase: &str, error: &str, duration_ms: u128) {
    let sanitized_error = redact_error_message(error);

    error!(
        project_id = %project_id,
        phase = %phase,
        duration_ms = %duration_ms,
        error = %sanitized_error,
        "Phase execution failed"
    );
}

pub fn log_cache_stats(stats: &CacheStats) {
    tracing::info!(
        target: "chempilot::cache",
        hits = stats.hits,
        misses = stats.misses,
        writes = stats.writes,
        hit_ratio = stats.hit_ratio(),
        "Report cache stats: hits={}, misses={}, writes={}, hit_ratio={:.2}",
        stats.hits,
        stats.misses,
        stats.writes,
        stats.hit_ratio()
    );
}
