//! Tagged reference to either kind of node in the hierarchy.

use serde::{Deserialize, Serialize};

use docvault_core::types::{DocumentId, FolderId};

/// A folder or document id, used wherever the two kinds share a code path
/// (parent list splicing, logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder node.
    Folder(FolderId),
    /// A document node.
    Document(DocumentId),
}

impl From<FolderId> for NodeKind {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl From<DocumentId> for NodeKind {
    fn from(id: DocumentId) -> Self {
        Self::Document(id)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder(id) => write!(f, "folder:{id}"),
            Self::Document(id) => write!(f, "document:{id}"),
        }
    }
}
