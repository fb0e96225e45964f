//! Log redaction for raw cell values.

/// Placeholder used when value logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Returns the input value when value logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str, log_values: bool) -> &str {
    if log_values { value } else { REDACTED_VALUE }
}
