//! Transaction coordination for the relational tree store.
//!
//! A [`UnitOfWork`] wraps one database transaction. Every relational change
//! of a hierarchy mutation goes through the same unit so the node update and
//! the parent list updates land together. Dropping a unit without calling
//! [`UnitOfWork::commit`] rolls all of it back, which is what happens when an
//! error is propagated with `?` from inside the unit.
//!
//! Units start with `BEGIN IMMEDIATE`: the write lock is taken up front, so
//! concurrent units wait for each other on the busy timeout instead of
//! failing when a read-only transaction tries to upgrade to a writer.
//!
//! File mirror operations never run inside a unit. Callers commit first and
//! only then touch the filesystem.

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;

/// Opens units of work against the tree store.
#[derive(Debug, Clone)]
pub struct TransactionCoordinator {
    pool: SqlitePool,
}

impl TransactionCoordinator {
    /// Create a coordinator over a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Begin a new unit of work holding the database write lock.
    pub async fn begin(&self, label: &'static str) -> AppResult<UnitOfWork> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to begin transaction for {label}"),
                e,
            )
        })?;
        debug!(unit = label, "Transaction started");
        Ok(UnitOfWork {
            tx,
            outcome: Outcome {
                label,
                committed: false,
            },
        })
    }

    /// Acquire a plain connection for read-only work outside a unit.
    pub async fn reader(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e))
    }
}

/// One open database transaction.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    outcome: Outcome,
}

impl UnitOfWork {
    /// The connection all statements of this unit must run on.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Commit every change made in this unit.
    pub async fn commit(self) -> AppResult<()> {
        let Self { tx, mut outcome } = self;
        let label = outcome.label;
        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to commit transaction for {label}"),
                e,
            )
        })?;
        outcome.committed = true;
        debug!(unit = label, "Transaction committed");
        Ok(())
    }
}

/// Logs the rollback of a unit that goes out of scope uncommitted.
#[derive(Debug)]
struct Outcome {
    label: &'static str,
    committed: bool,
}

impl Drop for Outcome {
    fn drop(&mut self) {
        if !self.committed {
            debug!(unit = self.label, "Transaction rolled back");
        }
    }
}
