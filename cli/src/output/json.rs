//! JSON output helpers.
//!
//! Used by every `--json` code path: reports on success, an error object on
//! failure.

use anyhow::{Context, Result};
use serde::Serialize;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(report).context("JSON serialization failed")
}
