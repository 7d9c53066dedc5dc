//! Whole-tree reads and path lookups.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_database::TransactionCoordinator;
use docvault_database::repositories::{DocumentRepository, FolderRepository};
use docvault_entity::document::Document;
use docvault_entity::folder::{DocumentSummary, Folder, FolderNode, FolderTree};
use docvault_entity::node::NodeKind;

use crate::path::{MAX_HIERARCHY_DEPTH, PathResolver};

/// Builds the fully expanded folder tree.
#[derive(Debug, Clone)]
pub struct TreeService {
    coordinator: TransactionCoordinator,
    folder_repo: FolderRepository,
    document_repo: DocumentRepository,
    resolver: PathResolver,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(coordinator: TransactionCoordinator) -> Self {
        Self {
            coordinator,
            folder_repo: FolderRepository::new(),
            document_repo: DocumentRepository::new(),
            resolver: PathResolver::new(),
        }
    }

    /// Returns every folder and document, nested from the root in list order.
    pub async fn get_all_folders(&self) -> AppResult<FolderTree> {
        let mut conn = self.coordinator.reader().await?;
        let root = self
            .folder_repo
            .find_root(&mut conn)
            .await?
            .ok_or_else(|| AppError::not_found("Root folder has not been created"))?;

        let folders: HashMap<FolderId, Folder> = self
            .folder_repo
            .find_all(&mut conn)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        let documents: HashMap<DocumentId, Document> = self
            .document_repo
            .find_all(&mut conn)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let mut visited = HashSet::new();
        let tree = FolderTree::new(expand(&root, 0, &folders, &documents, &mut visited)?);
        debug!(
            folders = tree.total_folders,
            documents = tree.total_documents,
            "Folder tree loaded"
        );
        Ok(tree)
    }

    /// Resolves a node to its path relative to the mirror tree root.
    pub async fn resolve_path(&self, node: NodeKind) -> AppResult<String> {
        let mut conn = self.coordinator.reader().await?;
        self.resolver.resolve(&mut conn, node).await
    }
}

fn expand(
    folder: &Folder,
    depth: usize,
    folders: &HashMap<FolderId, Folder>,
    documents: &HashMap<DocumentId, Document>,
    visited: &mut HashSet<FolderId>,
) -> AppResult<FolderNode> {
    if depth > MAX_HIERARCHY_DEPTH || !visited.insert(folder.id) {
        return Err(AppError::corrupt_hierarchy(format!(
            "Folder {} appears more than once in the tree",
            folder.id
        )));
    }

    let docs = folder
        .documents
        .iter()
        .filter_map(|id| documents.get(id))
        .map(DocumentSummary::from)
        .collect();

    let mut subfolders = Vec::with_capacity(folder.subfolders.len());
    for id in &folder.subfolders {
        match folders.get(id) {
            Some(child) => subfolders.push(expand(child, depth + 1, folders, documents, visited)?),
            None => warn!(folder_id = %folder.id, child_id = %id, "Subfolder list references a missing folder"),
        }
    }

    Ok(FolderNode {
        id: folder.id,
        name: folder.name.clone(),
        parent_folder: folder.parent_folder,
        documents: docs,
        subfolders,
    })
}
