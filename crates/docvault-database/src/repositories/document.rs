//! Document repository implementation.

use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::{Document, DocumentListing};

const COLUMNS: &str = "id, name, extension, format, parent_id, description";

/// Repository for document rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRepository;

#[derive(FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    document: Document,
    parent_name: String,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new() -> Self {
        Self
    }

    /// Find a document by ID.
    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: DocumentId,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(&format!("SELECT {COLUMNS} FROM documents WHERE id = ?"))
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Find a document by ID, failing with `NotFound` if absent.
    pub async fn get(&self, conn: &mut SqliteConnection, id: DocumentId) -> AppResult<Document> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Find a document in `parent_id` by its (name, extension) pair.
    pub async fn find_sibling(
        &self,
        conn: &mut SqliteConnection,
        parent_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE parent_id = ? AND name = ? AND extension = ?"
        ))
        .bind(parent_id)
        .bind(name)
        .bind(extension)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find document by name", e)
        })
    }

    /// Find a child document of `parent_id` whose mirror file name,
    /// `name.extension`, equals `file_name`.
    pub async fn find_by_file_name(
        &self,
        conn: &mut SqliteConnection,
        parent_id: FolderId,
        file_name: &str,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {COLUMNS} FROM documents WHERE parent_id = ? AND name || '.' || extension = ?"
        ))
        .bind(parent_id)
        .bind(file_name)
        .fetch_optional(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find document by file name", e)
        })
    }

    /// Load several documents, returned in the order of `ids`. Missing ids
    /// are skipped.
    pub async fn find_many(
        &self,
        conn: &mut SqliteConnection,
        ids: &[DocumentId],
    ) -> AppResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM documents WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let mut rows = query
            .build_query_as::<Document>()
            .fetch_all(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load documents", e)
            })?;

        rows.sort_by_key(|d| ids.iter().position(|id| *id == d.id));
        Ok(rows)
    }

    /// Load every document.
    pub async fn find_all(&self, conn: &mut SqliteConnection) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(&format!("SELECT {COLUMNS} FROM documents"))
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// Load every document together with its parent folder's name.
    pub async fn find_all_with_parent(
        &self,
        conn: &mut SqliteConnection,
    ) -> AppResult<Vec<DocumentListing>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT d.id, d.name, d.extension, d.format, d.parent_id, d.description, \
             f.name AS parent_name \
             FROM documents d INNER JOIN folders f ON f.id = d.parent_id \
             ORDER BY f.name ASC, d.name ASC",
        )
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))?;

        Ok(rows
            .into_iter()
            .map(|row| DocumentListing {
                document: row.document,
                parent_name: row.parent_name,
            })
            .collect())
    }

    /// Insert a new document row.
    pub async fn insert(&self, conn: &mut SqliteConnection, doc: &Document) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, name, extension, format, parent_id, description) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(doc.id)
        .bind(&doc.name)
        .bind(&doc.extension)
        .bind(doc.format)
        .bind(doc.parent_folder)
        .bind(&doc.description)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Document named '{}' already exists here.",
                    doc.file_name()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })?;
        Ok(())
    }

    /// Persist every mutable field of an existing document.
    pub async fn update(&self, conn: &mut SqliteConnection, doc: &Document) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET name = ?, extension = ?, format = ?, parent_id = ?, \
             description = ? WHERE id = ?",
        )
        .bind(&doc.name)
        .bind(&doc.extension)
        .bind(doc.format)
        .bind(doc.parent_folder)
        .bind(&doc.description)
        .bind(doc.id)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Document named '{}' already exists here.",
                    doc.file_name()
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update document", e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Document {} not found", doc.id)));
        }
        Ok(())
    }

    /// Delete a document row. Returns whether a row was removed.
    pub async fn delete(&self, conn: &mut SqliteConnection, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
