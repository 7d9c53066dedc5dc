//! Upload staging area.
//!
//! Uploads are written here first and validated. The hierarchy engine later
//! commits a [`StagedFile`] into the mirror tree and clears the area.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tracing::debug;

use docvault_core::config::StorageConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::mirror::StagedFile;

/// Accepts uploads into the staging directory.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    max_upload_size_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl StagingArea {
    /// Create a staging area from the storage configuration.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.staging_root);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Mirror,
                format!("Failed to create staging area: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            max_upload_size_bytes: config.max_upload_size_bytes,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        })
    }

    /// The staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate an upload and write it into the staging directory.
    pub async fn stage(&self, original_name: &str, data: Bytes) -> AppResult<StagedFile> {
        let base_name = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::missing_fields("Upload has no file name"))?;

        let extension = base_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.contains(&extension) {
            return Err(AppError::validation(format!(
                "Invalid file type '{base_name}'. Allowed: {}",
                self.allowed_extensions.join(", ")
            )));
        }

        if data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let file_name = format!("{}-{base_name}", Utc::now().timestamp_millis());
        fs::write(self.root.join(&file_name), &data)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Mirror,
                    format!("Failed to stage upload: {file_name}"),
                    e,
                )
            })?;

        debug!(file_name = %file_name, bytes = data.len(), "Staged upload");
        Ok(StagedFile {
            file_name,
            original_name: base_name.to_string(),
            size_bytes: data.len() as u64,
        })
    }
}
