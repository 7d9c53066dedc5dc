//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod document;
pub mod folder;
pub mod node;

pub use document::{Document, DocumentFormat, DocumentListing};
pub use folder::{DocumentSummary, Folder, FolderContents, FolderNode, FolderTree};
pub use node::NodeKind;
