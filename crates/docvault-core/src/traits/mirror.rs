//! File mirror trait for the physical copy of the folder hierarchy.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A temporary upload sitting in the staging area, ready to be committed
/// into the mirror tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    /// File name inside the staging area.
    pub file_name: String,
    /// Name the file was uploaded under.
    pub original_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Physical storage primitives the hierarchy engine mirrors its changes onto.
///
/// Every path is relative to the mirror tree root and uses `/` as the
/// separator. None of these operations take part in a database transaction.
#[async_trait]
pub trait FileMirror: Send + Sync + std::fmt::Debug + 'static {
    /// Create an empty directory. Fails if it already exists or its parent
    /// is missing.
    async fn create_directory(&self, path: &str) -> AppResult<()>;

    /// Move or rename a file or directory, falling back to copy-then-delete
    /// when an atomic rename is not possible.
    async fn move_or_rename(&self, old_path: &str, new_path: &str) -> AppResult<()>;

    /// Delete a file or an empty directory.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Move a staged upload into the mirror tree at `path`.
    async fn commit_staged(&self, staged: &StagedFile, path: &str) -> AppResult<()>;

    /// Remove every file from the staging area. Failures are logged, never
    /// returned.
    async fn clear_staging_area(&self);
}
