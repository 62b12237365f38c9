//! Redaction of credentials from messages before they are logged or shown.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://)[^:@\s]+:[^@\s]+@").expect("Failed to create URL credentials regex")
});

/// Pattern to match API keys passed as a query parameter
static KEY_QUERY_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([?&](?:key|api_key)=)[^&\s]+").expect("Failed to create query key regex")
});

/// Pattern to match potential API keys (long alphanumeric strings)
static POTENTIAL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_-])[A-Za-z0-9_-]{32,}(?:[^A-Za-z0-9_-]|$)")
        .expect("Failed to create potential key regex")
});

/// Redact sensitive information from an error message.
///
/// - URLs with embedded credentials keep only scheme and host
/// - `key=` query parameters are blanked
/// - Long key-like tokens are replaced wholesale
#[must_use]
pub fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = KEY_QUERY_PARAM.replace_all(&redacted, "${1}[REDACTED]");
    let redacted = POTENTIAL_KEY.replace_all(&redacted, " [REDACTED_KEY] ");
    redacted.to_string()
}
