//! Applies the SQLite tree store schema.
//!
//! `folders` keeps each folder's ordered child ids as JSON arrays, with a
//! partial unique index allowing a single parentless root. `documents` is
//! unique on (parent, name, extension).

use sqlx::SqlitePool;
use tracing::info;

use docvault_core::error::{AppError, ErrorKind};

/// Create or upgrade the `folders` and `documents` tables.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    info!("Applying tree store schema");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to apply tree store schema: {e}"),
                e,
            )
        })?;

    info!("Tree store schema is current");
    Ok(())
}
