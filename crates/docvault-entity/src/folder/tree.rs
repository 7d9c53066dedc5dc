//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use docvault_core::types::{DocumentId, FolderId};

use crate::document::Document;
use crate::folder::Folder;

/// The direct children of one folder, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderContents {
    /// Documents directly inside the folder.
    pub documents: Vec<Document>,
    /// Subfolders directly inside the folder.
    pub subfolders: Vec<Folder>,
}

/// Minimal document entry shown inside a tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document ID.
    pub id: DocumentId,
    /// Document name (without extension).
    pub name: String,
    /// File extension.
    pub extension: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            extension: doc.extension.clone(),
        }
    }
}

/// A fully expanded folder in a tree view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID.
    pub parent_folder: Option<FolderId>,
    /// Documents in display order.
    pub documents: Vec<DocumentSummary>,
    /// Expanded subfolders in display order.
    pub subfolders: Vec<FolderNode>,
}

impl FolderNode {
    /// Number of folders in this subtree, including this one.
    pub fn folder_count(&self) -> u64 {
        1 + self.subfolders.iter().map(FolderNode::folder_count).sum::<u64>()
    }

    /// Number of documents in this subtree.
    pub fn document_count(&self) -> u64 {
        self.documents.len() as u64
            + self
                .subfolders
                .iter()
                .map(FolderNode::document_count)
                .sum::<u64>()
    }
}

/// The complete hierarchy rooted at the root folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node.
    pub root: FolderNode,
    /// Total number of folders in the tree.
    pub total_folders: u64,
    /// Total number of documents in the tree.
    pub total_documents: u64,
}

impl FolderTree {
    /// Wrap an expanded root node, computing totals.
    pub fn new(root: FolderNode) -> Self {
        Self {
            total_folders: root.folder_count(),
            total_documents: root.document_count(),
            root,
        }
    }
}
