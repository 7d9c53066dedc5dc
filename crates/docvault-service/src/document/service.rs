//! Document mutations and reads.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{FileMirror, StagedFile};
use docvault_core::types::{DocumentId, FolderId};
use docvault_database::TransactionCoordinator;
use docvault_database::repositories::{DocumentRepository, FolderRepository};
use docvault_entity::document::{Document, DocumentListing};
use docvault_entity::node::NodeKind;

use crate::consistency::after_commit;
use crate::context::RequestContext;
use crate::naming::require_segment;
use crate::ordering::{Placement, insertion_index};
use crate::path::PathResolver;

/// Request to create a document from a staged upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    /// Parent folder ID.
    pub parent_folder: FolderId,
    /// Document name without extension.
    pub name: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
}

/// Request to move a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDocumentRequest {
    /// New parent folder ID.
    pub move_to: FolderId,
    /// Sibling to place the document after; `None` places it first.
    pub place_after: Option<DocumentId>,
}

/// A document record together with its mirror path and contents.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithContent {
    /// The document record.
    pub document: Document,
    /// Path relative to the mirror tree root.
    pub path: String,
    /// File contents.
    #[serde(skip)]
    pub content: Bytes,
}

/// Manages document mutations against the tree store and the file mirror.
#[derive(Debug, Clone)]
pub struct DocumentService {
    coordinator: TransactionCoordinator,
    folder_repo: FolderRepository,
    document_repo: DocumentRepository,
    resolver: PathResolver,
    mirror: Arc<dyn FileMirror>,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(coordinator: TransactionCoordinator, mirror: Arc<dyn FileMirror>) -> Self {
        Self {
            coordinator,
            folder_repo: FolderRepository::new(),
            document_repo: DocumentRepository::new(),
            resolver: PathResolver::new(),
            mirror,
        }
    }

    /// Gets a document record by ID.
    pub async fn get_document_record(&self, document_id: DocumentId) -> AppResult<Document> {
        let mut conn = self.coordinator.reader().await?;
        self.document_repo.get(&mut conn, document_id).await
    }

    /// Gets a document with its resolved path and file contents.
    pub async fn get_document(&self, document_id: DocumentId) -> AppResult<DocumentWithContent> {
        let (document, path) = {
            let mut conn = self.coordinator.reader().await?;
            let document = self.document_repo.get(&mut conn, document_id).await?;
            let path = self.resolver.document_path(&mut conn, &document).await?;
            (document, path)
        };

        let content = self.mirror.read_bytes(&path).await?;
        Ok(DocumentWithContent {
            document,
            path,
            content,
        })
    }

    /// Lists every document with the name of its parent folder.
    pub async fn get_all_documents(&self) -> AppResult<Vec<DocumentListing>> {
        let mut conn = self.coordinator.reader().await?;
        self.document_repo.find_all_with_parent(&mut conn).await
    }

    /// Creates a document from a staged upload.
    ///
    /// The staging area is cleared afterwards whether or not creation
    /// succeeded.
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        req: CreateDocumentRequest,
        staged: StagedFile,
    ) -> AppResult<Document> {
        let result = self.create_from_staged(ctx, req, &staged).await;
        self.mirror.clear_staging_area().await;
        result
    }

    async fn create_from_staged(
        &self,
        ctx: &RequestContext,
        req: CreateDocumentRequest,
        staged: &StagedFile,
    ) -> AppResult<Document> {
        let name = require_segment("Document name", &req.name)?;
        let extension = require_segment("Document extension", &req.extension)?;

        let mut unit = self.coordinator.begin("create_document").await?;
        let mut parent = self.folder_repo.get(unit.conn(), req.parent_folder).await?;
        self.ensure_name_free(unit.conn(), parent.id, &name, &extension)
            .await?;

        let document = Document::new(parent.id, name, extension, req.description);
        self.document_repo.insert(unit.conn(), &document).await?;
        parent.insert_child(NodeKind::Document(document.id), None);
        self.folder_repo.update(unit.conn(), &parent).await?;

        let path = self.resolver.document_path(unit.conn(), &document).await?;
        unit.commit().await?;

        after_commit(
            "create_document",
            self.mirror.commit_staged(staged, &path).await,
        )?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            document_id = %document.id,
            parent_id = %parent.id,
            path = %path,
            size_bytes = staged.size_bytes,
            "Document created"
        );
        Ok(document)
    }

    /// Renames a document and its mirror file. The extension is kept.
    pub async fn rename_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        new_name: &str,
    ) -> AppResult<Document> {
        let new_name = require_segment("New document name", new_name)?;

        let mut unit = self.coordinator.begin("rename_document").await?;
        let mut document = self.document_repo.get(unit.conn(), document_id).await?;
        if document.name == new_name {
            debug!(document_id = %document.id, "Rename to the current name, nothing to do");
            return Ok(document);
        }
        self.ensure_name_free(
            unit.conn(),
            document.parent_folder,
            &new_name,
            &document.extension,
        )
        .await?;

        let old_path = self.resolver.document_path(unit.conn(), &document).await?;
        document.name = new_name;
        self.document_repo.update(unit.conn(), &document).await?;
        let new_path = self.resolver.document_path(unit.conn(), &document).await?;
        unit.commit().await?;

        after_commit(
            "rename_document",
            self.mirror.move_or_rename(&old_path, &new_path).await,
        )?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            document_id = %document.id,
            old_path = %old_path,
            new_path = %new_path,
            "Document renamed"
        );
        Ok(document)
    }

    /// Moves a document to another folder, or reorders it among its siblings.
    pub async fn move_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        req: MoveDocumentRequest,
    ) -> AppResult<Document> {
        let mut unit = self.coordinator.begin("move_document").await?;
        let mut document = self.document_repo.get(unit.conn(), document_id).await?;
        let node = NodeKind::Document(document.id);

        let mut current_parent = self
            .folder_repo
            .get(unit.conn(), document.parent_folder)
            .await?;
        let same_parent = current_parent.id == req.move_to;
        let mut target = if same_parent {
            None
        } else {
            Some(self.folder_repo.get(unit.conn(), req.move_to).await?)
        };

        let current_index = current_parent.position_of(node).ok_or_else(|| {
            AppError::corrupt_hierarchy(format!(
                "Document {} is missing from the document list of its parent",
                document.id
            ))
        })?;
        let placement = Placement::resolve(
            target.as_ref().unwrap_or(&current_parent),
            req.place_after.map(NodeKind::Document),
        )?;
        let index = insertion_index(current_index, same_parent, placement);

        if same_parent && index == current_index {
            debug!(document_id = %document.id, "Document already at the requested position");
            return Ok(document);
        }

        if !same_parent {
            self.ensure_name_free(unit.conn(), req.move_to, &document.name, &document.extension)
                .await?;
        }

        let old_path = self.resolver.document_path(unit.conn(), &document).await?;
        document.parent_folder = req.move_to;
        self.document_repo.update(unit.conn(), &document).await?;

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

        let new_path = self.resolver.document_path(unit.conn(), &document).await?;
        unit.commit().await?;

        if same_parent {
            info!(subject = %ctx.subject, permission = %ctx.permission, document_id = %document.id, index, "Document reordered");
        } else {
            after_commit(
                "move_document",
                self.mirror.move_or_rename(&old_path, &new_path).await,
            )?;
            info!(
                subject = %ctx.subject,
                permission = %ctx.permission,
                document_id = %document.id,
                old_path = %old_path,
                new_path = %new_path,
                index,
                "Document moved"
            );
        }
        Ok(document)
    }

    /// Replaces a document's description. The mirror is not touched.
    pub async fn update_document_description(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        description: &str,
    ) -> AppResult<Document> {
        let mut unit = self.coordinator.begin("update_document_description").await?;
        let mut document = self.document_repo.get(unit.conn(), document_id).await?;
        if document.description == description {
            return Ok(document);
        }

        document.description = description.to_string();
        self.document_repo.update(unit.conn(), &document).await?;
        unit.commit().await?;

        info!(subject = %ctx.subject, permission = %ctx.permission, document_id = %document.id, "Document description updated");
        Ok(document)
    }

    /// Deletes a document and its mirror file.
    pub async fn delete_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<()> {
        let mut unit = self.coordinator.begin("delete_document").await?;
        let document = self.document_repo.get(unit.conn(), document_id).await?;
        let path = self.resolver.document_path(unit.conn(), &document).await?;

        self.document_repo.delete(unit.conn(), document.id).await?;
        let mut parent = self
            .folder_repo
            .get(unit.conn(), document.parent_folder)
            .await?;
        parent.remove_child(NodeKind::Document(document.id));
        self.folder_repo.update(unit.conn(), &parent).await?;
        unit.commit().await?;

        after_commit("delete_document", self.mirror.delete(&path).await)?;

        info!(
            subject = %ctx.subject,
            permission = %ctx.permission,
            document_id = %document.id,
            path = %path,
            "Document deleted"
        );
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        conn: &mut sqlx::SqliteConnection,
        parent_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<()> {
        if self
            .document_repo
            .find_sibling(conn, parent_id, name, extension)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Document named '{name}.{extension}' already exists here."
            )));
        }
        let file_name = format!("{name}.{extension}");
        if self
            .folder_repo
            .find_child_by_name(conn, parent_id, &file_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{file_name}' already exists here."
            )));
        }
        Ok(())
    }
}
