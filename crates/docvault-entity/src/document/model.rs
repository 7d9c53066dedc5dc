//! Document entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{DocumentId, FolderId};

use super::format::DocumentFormat;

/// A document stored in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// Document name, without extension.
    pub name: String,
    /// File extension, without the leading dot.
    pub extension: String,
    /// Storage format.
    pub format: DocumentFormat,
    /// The folder containing this document.
    #[sqlx(rename = "parent_id")]
    pub parent_folder: FolderId,
    /// Free-form description.
    pub description: String,
}

impl Document {
    /// Build a new file document under `parent`.
    pub fn new(
        parent: FolderId,
        name: impl Into<String>,
        extension: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            extension: extension.into(),
            format: DocumentFormat::File,
            parent_folder: parent,
            description: description.into(),
        }
    }

    /// Name including the extension, as it appears in the mirror.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }
}

/// A document together with the name of the folder that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListing {
    /// The document record.
    #[serde(flatten)]
    pub document: Document,
    /// Name of the parent folder.
    pub parent_name: String,
}
