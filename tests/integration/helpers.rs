//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use docvault_core::config::{AppConfig, DatabaseConfig, StorageConfig};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_database::DatabasePool;
use docvault_entity::document::Document;
use docvault_entity::folder::Folder;
use docvault_service::{
    CreateDocumentRequest, CreateFolderRequest, PermissionLevel, RequestContext, Services,
};
use docvault_storage::{LocalFileMirror, StagingArea};

/// A complete vault over a temporary directory.
pub struct TestVault {
    /// Every engine service.
    pub services: Services,
    /// Upload staging area.
    pub staging: StagingArea,
    /// Context used for every mutation.
    pub ctx: RequestContext,
    /// The root folder.
    pub root: Folder,
    /// Application config pointing into the temporary directory.
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestVault {
    /// Create a fresh vault with a bootstrapped root folder.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = AppConfig {
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("vault.db").display()),
                ..DatabaseConfig::default()
            },
            storage: StorageConfig {
                tree_root: dir.path().join("tree").display().to_string(),
                staging_root: dir.path().join("temp").display().to_string(),
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        };

        let db_pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        docvault_database::migration::run_migrations(db_pool.pool())
            .await
            .expect("Failed to run migrations");

        let mirror = LocalFileMirror::from_config(&config.storage)
            .await
            .expect("Failed to init mirror");
        let staging = StagingArea::from_config(&config.storage)
            .await
            .expect("Failed to init staging area");

        let services = Services::new(&db_pool, Arc::new(mirror));
        let ctx = RequestContext::new("integration", PermissionLevel::Admin);
        let root = services
            .folders
            .ensure_root(&ctx)
            .await
            .expect("Failed to create root folder");

        Self {
            services,
            staging,
            ctx,
            root,
            config,
            _dir: dir,
        }
    }

    /// Create a folder, panicking on failure.
    pub async fn folder(&self, name: &str, parent: FolderId) -> Folder {
        self.services
            .folders
            .create_folder(
                &self.ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_folder: parent,
                },
            )
            .await
            .expect("Failed to create folder")
    }

    /// Stage `content` and create it as a document under `parent`.
    pub async fn try_upload(
        &self,
        parent: FolderId,
        name: &str,
        extension: &str,
        content: &'static [u8],
    ) -> AppResult<Document> {
        let staged = self
            .staging
            .stage(&format!("{name}.{extension}"), Bytes::from_static(content))
            .await?;
        self.services
            .documents
            .create_document(
                &self.ctx,
                CreateDocumentRequest {
                    parent_folder: parent,
                    name: name.to_string(),
                    extension: extension.to_string(),
                    description: String::new(),
                },
                staged,
            )
            .await
    }

    /// Same as [`TestVault::try_upload`], panicking on failure.
    pub async fn upload(&self, parent: FolderId, name: &str, extension: &str) -> Document {
        self.try_upload(parent, name, extension, b"%PDF-1.7 test")
            .await
            .expect("Failed to create document")
    }

    /// Absolute location of a mirror path.
    pub fn tree_path(&self, relative: &str) -> PathBuf {
        PathBuf::from(&self.config.storage.tree_root).join(relative)
    }

    /// Number of entries left in the staging area.
    pub fn staging_count(&self) -> usize {
        std::fs::read_dir(&self.config.storage.staging_root)
            .expect("Failed to read staging area")
            .count()
    }

    /// Subfolder ids of a folder, in list order.
    pub async fn subfolders_of(&self, id: FolderId) -> Vec<FolderId> {
        self.services
            .folders
            .get_folder(id)
            .await
            .expect("Failed to load folder")
            .subfolders
    }
}
