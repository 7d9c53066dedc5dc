//! Folder mutations and tree reads.

pub mod service;
pub mod tree;

pub use service::{CreateFolderRequest, FolderService, MoveFolderRequest, ROOT_FOLDER_NAME};
pub use tree::TreeService;
