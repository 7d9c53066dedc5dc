//! # docvault-service
//!
//! The hierarchy mutation engine. Each service runs its relational changes
//! inside one unit of work and applies the matching file mirror change only
//! after the commit succeeded.
//!
//! Services follow constructor injection: the transaction coordinator and
//! the file mirror are handed in at construction time.

pub mod context;
pub mod document;
pub mod folder;
pub mod ordering;
pub mod path;
pub mod registry;

mod consistency;
mod naming;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{PermissionLevel, RequestContext};
pub use document::{
    CreateDocumentRequest, DocumentService, DocumentWithContent, MoveDocumentRequest,
};
pub use folder::{CreateFolderRequest, FolderService, MoveFolderRequest, TreeService};
pub use path::PathResolver;
pub use registry::Services;
