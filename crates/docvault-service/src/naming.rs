//! Validation of node names before they become path segments.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// Check a user supplied name that will become one path segment.
pub(crate) fn require_segment(field: &'static str, value: &str) -> AppResult<String> {
    if value.trim().is_empty() {
        return Err(AppError::missing_fields(format!("{field} is required")));
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(AppError::validation(format!(
            "{field} '{value}' is not a valid name"
        )));
    }
    Ok(value.to_string())
}
