//! Folder entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{DocumentId, FolderId};

use crate::node::NodeKind;

/// A folder in the document hierarchy.
///
/// The two child lists are ordered; a child's position is its display
/// order among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null only for the root).
    #[sqlx(rename = "parent_id")]
    pub parent_folder: Option<FolderId>,
    /// Ordered ids of the documents directly inside this folder.
    #[sqlx(json)]
    pub documents: Vec<DocumentId>,
    /// Ordered ids of the subfolders directly inside this folder.
    #[sqlx(json)]
    pub subfolders: Vec<FolderId>,
}

impl Folder {
    /// Build a new, empty folder under `parent`.
    pub fn new(name: impl Into<String>, parent: Option<FolderId>) -> Self {
        Self {
            id: FolderId::new(),
            name: name.into(),
            parent_folder: parent,
            documents: Vec::new(),
            subfolders: Vec::new(),
        }
    }

    /// Check if this is the root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder.is_none()
    }

    /// Whether the folder has no documents and no subfolders.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.subfolders.is_empty()
    }

    /// Position of a child in the list matching its kind.
    pub fn position_of(&self, node: NodeKind) -> Option<usize> {
        match node {
            NodeKind::Folder(id) => self.subfolders.iter().position(|c| *c == id),
            NodeKind::Document(id) => self.documents.iter().position(|c| *c == id),
        }
    }

    /// Insert a child into the list matching its kind.
    ///
    /// `None` appends; an index past the end is clamped to the end.
    pub fn insert_child(&mut self, node: NodeKind, index: Option<usize>) {
        match node {
            NodeKind::Folder(id) => splice_in(&mut self.subfolders, id, index),
            NodeKind::Document(id) => splice_in(&mut self.documents, id, index),
        }
    }

    /// Remove every occurrence of a child. Returns whether anything was
    /// removed.
    pub fn remove_child(&mut self, node: NodeKind) -> bool {
        match node {
            NodeKind::Folder(id) => remove_all(&mut self.subfolders, id),
            NodeKind::Document(id) => remove_all(&mut self.documents, id),
        }
    }
}

fn splice_in<T>(list: &mut Vec<T>, id: T, index: Option<usize>) {
    let at = index.map_or(list.len(), |i| i.min(list.len()));
    list.insert(at, id);
}

fn remove_all<T: PartialEq>(list: &mut Vec<T>, id: T) -> bool {
    let before = list.len();
    list.retain(|c| *c != id);
    list.len() != before
}
