//! Shared fixtures for the unit tests of this crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;

use docvault_core::config::{DatabaseConfig, StorageConfig};
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{FileMirror, StagedFile};
use docvault_database::migration::run_migrations;
use docvault_database::{DatabasePool, TransactionCoordinator};
use docvault_entity::document::Document;
use docvault_entity::folder::Folder;
use docvault_storage::{LocalFileMirror, StagingArea};

use crate::context::{PermissionLevel, RequestContext};
use crate::document::CreateDocumentRequest;
use crate::registry::Services;

async fn temp_database(dir: &TempDir) -> DatabasePool {
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("test.db").display()),
        ..DatabaseConfig::default()
    };
    let pool = DatabasePool::connect(&config).await.unwrap();
    run_migrations(pool.pool()).await.unwrap();
    pool
}

/// A migrated database with nothing else around it.
pub async fn temp_coordinator() -> (TempDir, TransactionCoordinator) {
    let dir = tempfile::tempdir().unwrap();
    let pool = temp_database(&dir).await;
    (dir, TransactionCoordinator::new(pool.pool().clone()))
}

/// Every service over a temporary database and mirror, with the root created.
pub struct TestStack {
    pub services: Services,
    pub staging: StagingArea,
    pub ctx: RequestContext,
    pub root: Folder,
    storage: StorageConfig,
    _dir: TempDir,
}

impl TestStack {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_config(&dir);
        let mirror = LocalFileMirror::from_config(&storage).await.unwrap();
        Self::build(dir, storage, Arc::new(mirror)).await
    }

    pub async fn with_mirror(mirror: Arc<dyn FileMirror>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_config(&dir);
        Self::build(dir, storage, mirror).await
    }

    async fn build(dir: TempDir, storage: StorageConfig, mirror: Arc<dyn FileMirror>) -> Self {
        let pool = temp_database(&dir).await;
        let staging = StagingArea::from_config(&storage).await.unwrap();
        let services = Services::new(&pool, mirror);
        let ctx = RequestContext::new("tester", PermissionLevel::User);
        let root = services.folders.ensure_root(&ctx).await.unwrap();
        Self {
            services,
            staging,
            ctx,
            root,
            storage,
            _dir: dir,
        }
    }

    /// Absolute location of a mirror path.
    pub fn tree_path(&self, relative: &str) -> PathBuf {
        PathBuf::from(&self.storage.tree_root).join(relative)
    }

    /// Number of files left in the staging area.
    pub fn staging_entries(&self) -> usize {
        std::fs::read_dir(&self.storage.staging_root).unwrap().count()
    }

    /// Stage `%PDF-{name}` and create it as a document under the root.
    pub async fn upload(&self, name: &str, extension: &str) -> AppResult<Document> {
        let staged = self
            .staging
            .stage(
                &format!("{name}.{extension}"),
                Bytes::from(format!("%PDF-{name}")),
            )
            .await?;
        self.services
            .documents
            .create_document(
                &self.ctx,
                CreateDocumentRequest {
                    parent_folder: self.root.id,
                    name: name.to_string(),
                    extension: extension.to_string(),
                    description: String::new(),
                },
                staged,
            )
            .await
    }
}

fn storage_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        tree_root: dir.path().join("tree").display().to_string(),
        staging_root: dir.path().join("temp").display().to_string(),
        ..StorageConfig::default()
    }
}

/// A mirror whose every mutation fails.
#[derive(Debug, Default)]
pub struct FailingMirror {
    clears: AtomicUsize,
}

impl FailingMirror {
    pub fn staging_clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileMirror for FailingMirror {
    async fn create_directory(&self, path: &str) -> AppResult<()> {
        Err(AppError::mirror(format!("disk unavailable: {path}")))
    }

    async fn move_or_rename(&self, old_path: &str, _new_path: &str) -> AppResult<()> {
        Err(AppError::mirror(format!("disk unavailable: {old_path}")))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        Err(AppError::mirror(format!("disk unavailable: {path}")))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        Err(AppError::mirror(format!("disk unavailable: {path}")))
    }

    async fn commit_staged(&self, _staged: &StagedFile, path: &str) -> AppResult<()> {
        Err(AppError::mirror(format!("disk unavailable: {path}")))
    }

    async fn clear_staging_area(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
