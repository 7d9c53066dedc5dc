//! Local filesystem mirror provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use docvault_core::config::StorageConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::mirror::{FileMirror, StagedFile};

/// Mirrors the folder hierarchy onto a directory tree on local disk.
#[derive(Debug, Clone)]
pub struct LocalFileMirror {
    /// Directory the hierarchy root maps to.
    tree_root: PathBuf,
    /// Directory holding staged uploads.
    staging_root: PathBuf,
}

impl LocalFileMirror {
    /// Create a mirror, creating both roots if they do not exist yet.
    pub async fn new(tree_root: impl Into<PathBuf>, staging_root: impl Into<PathBuf>) -> AppResult<Self> {
        let tree_root = tree_root.into();
        let staging_root = staging_root.into();
        for dir in [&tree_root, &staging_root] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Mirror,
                    format!("Failed to create storage root: {}", dir.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            tree_root,
            staging_root,
        })
    }

    /// Create a mirror from the storage configuration section.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        Self::new(&config.tree_root, &config.staging_root).await
    }

    /// The directory the hierarchy root maps to.
    pub fn tree_root(&self) -> &Path {
        &self.tree_root
    }

    /// The staging directory.
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Resolve a relative mirror path to an absolute path within the tree
    /// root, rejecting anything that could escape it.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        confine(&self.tree_root, path)
    }

    /// Rename, or copy then delete when the rename is refused (for example
    /// across devices).
    async fn relocate(&self, from: &Path, to: &Path) -> AppResult<()> {
        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                debug!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %rename_err,
                    "Rename failed, falling back to copy"
                );
                self.copy_then_remove(from, to).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Mirror,
                        format!(
                            "Failed to move {} -> {}: {}",
                            from.display(),
                            to.display(),
                            e.message
                        ),
                        e,
                    )
                })
            }
        }
    }

    async fn copy_then_remove(&self, from: &Path, to: &Path) -> AppResult<()> {
        let meta = fs::metadata(from).await?;
        if meta.is_dir() {
            if let Err(e) = copy_dir(from, to).await {
                let _ = fs::remove_dir_all(to).await;
                return Err(e);
            }
            fs::remove_dir_all(from).await?;
        } else {
            if let Err(e) = stream_copy(from, to).await {
                // Leave no half-written destination behind; the source is untouched.
                let _ = fs::remove_file(to).await;
                return Err(e);
            }
            fs::remove_file(from).await?;
        }
        Ok(())
    }
}

/// Join `path` onto `root`, refusing absolute paths and parent components.
fn confine(root: &Path, path: &str) -> AppResult<PathBuf> {
    let relative = Path::new(path);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(AppError::validation(format!(
                    "Mirror path '{path}' must stay inside the storage root"
                )));
            }
        }
    }
    Ok(root.join(relative))
}

/// Stream a file's bytes into a new file.
async fn stream_copy(from: &Path, to: &Path) -> AppResult<u64> {
    let source = fs::File::open(from).await?;
    let mut dest = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .await?;

    let mut stream = ReaderStream::new(source);
    let mut total_bytes = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        total_bytes += chunk.len() as u64;
        dest.write_all(&chunk).await?;
    }
    dest.flush().await?;
    Ok(total_bytes)
}

/// Recursively copy a directory tree.
async fn copy_dir(from: &Path, to: &Path) -> AppResult<()> {
    let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];
    while let Some((src, dst)) = pending.pop() {
        fs::create_dir(&dst).await?;
        let mut entries = fs::read_dir(&src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = dst.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                stream_copy(&entry.path(), &target).await?;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl FileMirror for LocalFileMirror {
    async fn create_directory(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Mirror,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        debug!(path, "Created directory");
        Ok(())
    }

    async fn move_or_rename(&self, old_path: &str, new_path: &str) -> AppResult<()> {
        let from = self.resolve(old_path)?;
        let to = self.resolve(new_path)?;
        if fs::try_exists(&to).await.unwrap_or(false) {
            return Err(AppError::mirror(format!(
                "Cannot move {old_path} -> {new_path}: destination exists"
            )));
        }
        self.relocate(&from, &to).await?;
        debug!(from = old_path, to = new_path, "Moved mirror entry");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Mirror, format!("Cannot delete {path}"), e)
        })?;

        let result = if meta.is_dir() {
            fs::remove_dir(&full_path).await
        } else {
            fs::remove_file(&full_path).await
        };
        result.map_err(|e| {
            AppError::with_source(ErrorKind::Mirror, format!("Failed to delete {path}"), e)
        })?;
        debug!(path, "Deleted mirror entry");
        Ok(())
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Mirror, format!("Failed to read file: {path}"), e)
        })?;
        Ok(Bytes::from(data))
    }

    async fn commit_staged(&self, staged: &StagedFile, path: &str) -> AppResult<()> {
        let from = confine(&self.staging_root, &staged.file_name)?;
        let to = self.resolve(path)?;
        if fs::try_exists(&to).await.unwrap_or(false) {
            return Err(AppError::mirror(format!(
                "Cannot commit upload to {path}: destination exists"
            )));
        }
        self.relocate(&from, &to).await?;
        info!(staged = %staged.file_name, path, "Committed staged upload");
        Ok(())
    }

    async fn clear_staging_area(&self) {
        let mut entries = match fs::read_dir(&self.staging_root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.staging_root.display(), error = %e, "Failed to read staging area");
                return;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read staging entry");
                    break;
                }
            };
            let path = entry.path();
            match entry.file_type().await {
                Ok(kind) if kind.is_file() => match fs::remove_file(&path).await {
                    Ok(()) => debug!(path = %path.display(), "Deleted staged file"),
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete staged file"),
                },
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to stat staged file"),
            }
        }
    }
}
