//! Folder repository implementation.

use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_entity::folder::Folder;

const COLUMNS: &str = "id, name, parent_id, documents, subfolders";

/// Repository for folder rows and their ordered child lists.
///
/// Every method runs on a caller-supplied connection so the same calls
/// serve both transactional units and plain reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderRepository;

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a folder by ID.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: FolderId,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {COLUMNS} FROM folders WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by ID, failing with `NotFound` if absent.
    pub async fn get(&self, conn: &mut SqliteConnection, id: FolderId) -> AppResult<Folder> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Find the single folder without a parent.
    pub async fn find_root(&self, conn: &mut SqliteConnection) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {COLUMNS} FROM folders WHERE parent_id IS NULL"
        ))
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root folder", e))
    }

    /// Find a subfolder of `parent_id` by name.
    pub async fn find_child_by_name(
        &self,
        conn: &mut SqliteConnection,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {COLUMNS} FROM folders WHERE parent_id = ? AND name = ?"
        ))
        .bind(parent_id)
        .bind(name)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
        })
    }

    /// Load several folders, returned in the order of `ids`. Missing ids are
    /// skipped.
    pub async fn find_many(
        &self,
        conn: &mut SqliteConnection,
        ids: &[FolderId],
    ) -> AppResult<Vec<Folder>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM folders WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let mut rows = query
            .build_query_as::<Folder>()
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folders", e))?;

        rows.sort_by_key(|f| ids.iter().position(|id| *id == f.id));
        Ok(rows)
    }

    /// Load every folder.
    pub async fn find_all(&self, conn: &mut SqliteConnection) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {COLUMNS} FROM folders"))
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Insert a new folder row.
    pub async fn insert(&self, conn: &mut SqliteConnection, folder: &Folder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folders (id, name, parent_id, documents, subfolders) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.parent_folder)
        .bind(Json(&folder.documents))
        .bind(Json(&folder.subfolders))
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder named '{}' already exists here.", folder.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })?;
        Ok(())
    }

    /// Persist the name, parent, and child lists of an existing folder.
    pub async fn update(&self, conn: &mut SqliteConnection, folder: &Folder) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE folders SET name = ?, parent_id = ?, documents = ?, subfolders = ? \
             WHERE id = ?",
        )
        .bind(&folder.name)
        .bind(folder.parent_folder)
        .bind(Json(&folder.documents))
        .bind(Json(&folder.subfolders))
        .bind(folder.id)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder named '{}' already exists here.", folder.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update folder", e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {} not found", folder.id)));
        }
        Ok(())
    }

    /// Delete a folder row. Returns whether a row was removed.
    pub async fn delete(&self, conn: &mut SqliteConnection, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
