//! Post-commit mirror phase.

use tracing::error;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// Surface a mirror failure that happened after the relational commit.
///
/// The tree store already holds the new state at this point, so the error
/// is reported as a divergence and never rolled back.
pub(crate) fn after_commit(operation: &'static str, result: AppResult<()>) -> AppResult<()> {
    result.map_err(|cause| {
        error!(
            operation,
            error = %cause,
            "File mirror diverged from the tree store"
        );
        AppError::mirror_divergence(operation, cause)
    })
}
