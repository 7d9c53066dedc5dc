//! Folder mutations: create, rename, move, delete, and direct lookups.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::FileMirror;
use docvault_core::types::FolderId;
use docvault_database::TransactionCoordinator;
use docvault_database::repositories::{DocumentRepository, FolderRepository};
use docvault_entity::folder::{Folder, FolderContents};
use docvault_entity::node::NodeKind;

use crate::consistency::after_commit;
use crate::context::RequestContext;
use crate::naming::require_segment;
use crate::ordering::{Placement, insertion_index};
use crate::path::PathResolver;

/// Name given to the single parentless folder.
pub const ROOT_FOLDER_NAME: &str = "root";

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID.
    pub parent_folder: FolderId,
}

/// Request to move a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    /// New parent folder ID.
    pub move_to: FolderId,
    /// Sibling to place the folder after; `None` places it first.
    pub place_after: Option<FolderId>,
}

/// Manages folder mutations against the tree store and the file mirror.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Transaction coordinator.
    coordinator: TransactionCoordinator,
    /// Folder repository.
    folder_repo: FolderRepository,
    /// Document repository.
    document_repo: DocumentRepository,
    /// Path resolver.
    resolver: PathResolver,
    /// Physical mirror of the tree.
    mirror: Arc<dyn FileMirror>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(coordinator: TransactionCoordinator, mirror: Arc<dyn FileMirror>) -> Self {
        Self {
            coordinator,
            folder_repo: FolderRepository::new(),
            document_repo: DocumentRepository::new(),
            resolver: PathResolver::new(),
            mirror,
        }
    }

    /// Creates the root folder row if the store has none yet.
    ///
    /// The mirror tree root itself is created by the mirror provider.
    pub async fn ensure_root(&self, ctx: &RequestContext) -> AppResult<Folder> {
        let mut unit = self.coordinator.begin("ensure_root").await?;
        if let Some(root) = self.folder_repo.find_root(unit.conn()).await? {
            debug!(folder_id = %root.id, "Root folder already present");
            return Ok(root);
        }

        let root = Folder::new(ROOT_FOLDER_NAME, None);
        self.folder_repo.insert(unit.conn(), &root).await?;
        unit.commit().await?;

        info!(subject = %ctx.subject, permission = %ctx.permission, folder_id = %root.id, "Root folder created");
        Ok(root)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        let mut conn = self.coordinator.reader().await?;
        self.folder_repo.get(&mut conn, folder_id).await
    }

    /// Lists the direct documents and subfolders of a folder, in list order.
    pub async fn get_folder_contents(&self, folder_id: FolderId) -> AppResult<FolderContents> {
        let mut conn = self.coordinator.reader().await?;
        let folder = self.folder_repo.get(&mut conn, folder_id).await?;
        let documents = self.document_repo.find_many(&mut conn, &folder.documents).await?;
        let subfolders = self.folder_repo.find_many(&mut conn, &folder.subfolders).await?;
        Ok(FolderContents {
            documents,
            subfolders,
        })
    }

    /// Creates a new folder at the end of its parent's subfolder list.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = require_segment("Folder name", &req.name)?;

        let mut unit = self.coordinator.begin("create_folder").await?;
        let mut parent = self.folder_repo.get(unit.conn(), req.parent_folder).await?;
        self.ensure_name_free(unit.conn(), parent.id, &name).await?;

        let folder = Folder::new(name, Some(parent.id));
        self.folder_repo.insert(unit.conn(), &folder).await?;
        parent.insert_child(NodeKind::Folder(folder.id), None);
        self.folder_repo.update(unit.conn(), &parent).await?;

        let path = self.resolver.folder_path(unit.conn(), &folder).await?;
        unit.commit().await?;

        after_commit("create_folder", self.mirror.create_directory(&path).await)?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            folder_id = %folder.id,
            parent_id = %parent.id,
            path = %path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder and its mirror directory.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        let new_name = require_segment("New folder name", new_name)?;

        let mut unit = self.coordinator.begin("rename_folder").await?;
        let mut folder = self.folder_repo.get(unit.conn(), folder_id).await?;
        let parent_id = require_not_root(&folder)?;

        if folder.name == new_name {
            debug!(folder_id = %folder.id, "Rename to the current name, nothing to do");
            return Ok(folder);
        }
        self.ensure_name_free(unit.conn(), parent_id, &new_name).await?;

        let old_path = self.resolver.folder_path(unit.conn(), &folder).await?;
        folder.name = new_name;
        self.folder_repo.update(unit.conn(), &folder).await?;
        let new_path = self.resolver.folder_path(unit.conn(), &folder).await?;
        unit.commit().await?;

        after_commit(
            "rename_folder",
            self.mirror.move_or_rename(&old_path, &new_path).await,
        )?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            folder_id = %folder.id,
            old_path = %old_path,
            new_path = %new_path,
            "Folder renamed"
        );
        Ok(folder)
    }

    /// Moves a folder under a new parent, or reorders it among its siblings.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: MoveFolderRequest,
    ) -> AppResult<Folder> {
        let mut unit = self.coordinator.begin("move_folder").await?;
        let mut folder = self.folder_repo.get(unit.conn(), folder_id).await?;
        let current_parent_id = require_not_root(&folder)?;
        let node = NodeKind::Folder(folder.id);

        let mut current_parent = self.folder_repo.get(unit.conn(), current_parent_id).await?;
        let same_parent = current_parent_id == req.move_to;
        let mut target = if same_parent {
            None
        } else {
            Some(self.folder_repo.get(unit.conn(), req.move_to).await?)
        };

        let current_index = current_parent.position_of(node).ok_or_else(|| {
            AppError::corrupt_hierarchy(format!(
                "Folder {} is missing from the subfolder list of its parent",
                folder.id
            ))
        })?;
        let placement = Placement::resolve(
            target.as_ref().unwrap_or(&current_parent),
            req.place_after.map(NodeKind::Folder),
        )?;
        let index = insertion_index(current_index, same_parent, placement);

        if same_parent && index == current_index {
            debug!(folder_id = %folder.id, "Folder already at the requested position");
            return Ok(folder);
        }

        if self
            .resolver
            .is_within(unit.conn(), req.move_to, folder.id)
            .await?
        {
            return Err(AppError::validation(
                "Cannot move a folder into itself or one of its subfolders",
            ));
        }

        if !same_parent {
            self.ensure_name_free(unit.conn(), req.move_to, &folder.name)
                .await?;
        }

        let old_path = self.resolver.folder_path(unit.conn(), &folder).await?;
        folder.parent_folder = Some(req.move_to);
        self.folder_repo.update(unit.conn(), &folder).await?;

        current_parent.remove_child(node);
        match target.as_mut() {
            Some(target) => {
                self.folder_repo.update(unit.conn(), &current_parent).await?;
                target.insert_child(node, Some(index));
                self.folder_repo.update(unit.conn(), target).await?;
            }
            None => {
                current_parent.insert_child(node, Some(index));
                self.folder_repo.update(unit.conn(), &current_parent).await?;
            }
        }

        let new_path = self.resolver.folder_path(unit.conn(), &folder).await?;
        unit.commit().await?;

        if same_parent {
            info!(
                subject = %ctx.subject,
                permission = %ctx.permission,
                folder_id = %folder.id,
                index,
                "Folder reordered"
            );
        } else {
            after_commit(
                "move_folder",
                self.mirror.move_or_rename(&old_path, &new_path).await,
            )?;
            info!(
                subject = %ctx.subject,
                permission = %ctx.permission,
                folder_id = %folder.id,
                old_path = %old_path,
                new_path = %new_path,
                index,
                "Folder moved"
            );
        }
        Ok(folder)
    }

    /// Deletes an empty folder and its mirror directory.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let mut unit = self.coordinator.begin("delete_folder").await?;
        let folder = self.folder_repo.get(unit.conn(), folder_id).await?;
        let parent_id = require_not_root(&folder)?;

        if !folder.is_empty() {
            return Err(AppError::validation(format!(
                "Folder '{}' is not empty",
                folder.name
            )));
        }

        let path = self.resolver.folder_path(unit.conn(), &folder).await?;
        self.folder_repo.delete(unit.conn(), folder.id).await?;

        let mut parent = self.folder_repo.get(unit.conn(), parent_id).await?;
        parent.remove_child(NodeKind::Folder(folder.id));
        self.folder_repo.update(unit.conn(), &parent).await?;
        unit.commit().await?;

        after_commit("delete_folder", self.mirror.delete(&path).await)?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            folder_id = %folder.id,
            path = %path,
            "Folder deleted"
        );
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        conn: &mut sqlx::SqliteConnection,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<()> {
        if self
            .folder_repo
            .find_child_by_name(conn, parent_id, name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Folder named '{name}' already exists here."
            )));
        }
        if self
            .document_repo
            .find_by_file_name(conn, parent_id, name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A document named '{name}' already exists here."
            )));
        }
        Ok(())
    }
}

/// The root folder can never be renamed, moved, or deleted.
fn require_not_root(folder: &Folder) -> AppResult<FolderId> {
    folder
        .parent_folder
        .ok_or_else(|| AppError::validation("The root folder is protected"))
}
