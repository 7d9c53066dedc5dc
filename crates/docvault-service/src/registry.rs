//! Wiring of every service over one pool and one mirror.

use std::sync::Arc;

use docvault_core::traits::FileMirror;
use docvault_database::{DatabasePool, TransactionCoordinator};

use crate::document::DocumentService;
use crate::folder::{FolderService, TreeService};

/// All engine services, sharing a coordinator and a file mirror.
#[derive(Debug, Clone)]
pub struct Services {
    /// Folder mutations.
    pub folders: FolderService,
    /// Document mutations and reads.
    pub documents: DocumentService,
    /// Whole-tree reads and path lookups.
    pub tree: TreeService,
}

impl Services {
    /// Build the services over a connected pool.
    pub fn new(pool: &DatabasePool, mirror: Arc<dyn FileMirror>) -> Self {
        let coordinator = TransactionCoordinator::new(pool.pool().clone());
        Self {
            folders: FolderService::new(coordinator.clone(), Arc::clone(&mirror)),
            documents: DocumentService::new(coordinator.clone(), mirror),
            tree: TreeService::new(coordinator),
        }
    }
}
