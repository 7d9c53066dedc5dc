//! Path resolution over the parent chain.
//!
//! Paths are relative to the mirror tree root. The root folder contributes
//! no segment, so a child of the root resolves to just its own name and the
//! root itself resolves to the empty path.

use std::collections::HashSet;

use sqlx::SqliteConnection;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_database::repositories::{DocumentRepository, FolderRepository};
use docvault_entity::document::Document;
use docvault_entity::folder::Folder;
use docvault_entity::node::NodeKind;

/// Upper bound on the number of ancestors a walk may visit.
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// Resolves nodes to mirror paths and answers ancestry questions.
///
/// Every lookup goes to the tree store; nothing is cached, so a resolver
/// called inside a unit of work sees that unit's uncommitted changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    folders: FolderRepository,
    documents: DocumentRepository,
}

impl PathResolver {
    /// Creates a new path resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a node by id and resolve its path.
    pub async fn resolve(&self, conn: &mut SqliteConnection, node: NodeKind) -> AppResult<String> {
        match node {
            NodeKind::Folder(id) => {
                let folder = self.folders.get(conn, id).await?;
                self.folder_path(conn, &folder).await
            }
            NodeKind::Document(id) => {
                let document = self.documents.get(conn, id).await?;
                self.document_path(conn, &document).await
            }
        }
    }

    /// Path of an already loaded folder.
    pub async fn folder_path(&self, conn: &mut SqliteConnection, folder: &Folder) -> AppResult<String> {
        match folder.parent_folder {
            None => Ok(String::new()),
            Some(parent) => {
                let mut visited = HashSet::from([folder.id]);
                self.join_with_ancestors(conn, folder.name.clone(), parent, &mut visited)
                    .await
            }
        }
    }

    /// Path of an already loaded document, including its extension.
    pub async fn document_path(
        &self,
        conn: &mut SqliteConnection,
        document: &Document,
    ) -> AppResult<String> {
        let mut visited = HashSet::new();
        self.join_with_ancestors(conn, document.file_name(), document.parent_folder, &mut visited)
            .await
    }

    /// Whether `candidate` is `ancestor` or lies somewhere beneath it.
    pub async fn is_within(
        &self,
        conn: &mut SqliteConnection,
        candidate: FolderId,
        ancestor: FolderId,
    ) -> AppResult<bool> {
        let mut visited = HashSet::new();
        let mut next = Some(candidate);

        while let Some(id) = next {
            if id == ancestor {
                return Ok(true);
            }
            let folder = self.visit(conn, id, &mut visited).await?;
            next = folder.parent_folder;
        }
        Ok(false)
    }

    async fn join_with_ancestors(
        &self,
        conn: &mut SqliteConnection,
        own_segment: String,
        parent: FolderId,
        visited: &mut HashSet<FolderId>,
    ) -> AppResult<String> {
        let mut segments = vec![own_segment];
        let mut next = Some(parent);

        while let Some(id) = next {
            let folder = self.visit(conn, id, visited).await?;
            if !folder.is_root() {
                segments.push(folder.name);
            }
            next = folder.parent_folder;
        }

        segments.reverse();
        Ok(segments.join("/"))
    }

    /// Load one ancestor, refusing revisits and walks past the depth bound.
    async fn visit(
        &self,
        conn: &mut SqliteConnection,
        id: FolderId,
        visited: &mut HashSet<FolderId>,
    ) -> AppResult<Folder> {
        if !visited.insert(id) {
            return Err(AppError::corrupt_hierarchy(format!(
                "Cycle detected at folder {id}"
            )));
        }
        if visited.len() > MAX_HIERARCHY_DEPTH {
            return Err(AppError::corrupt_hierarchy(format!(
                "Hierarchy deeper than {MAX_HIERARCHY_DEPTH} levels at folder {id}"
            )));
        }
        self.folders.find_by_id(conn, id).await?.ok_or_else(|| {
            AppError::corrupt_hierarchy(format!("Dangling parent reference to folder {id}"))
        })
    }
}
