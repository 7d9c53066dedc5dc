//! # docvault-storage
//!
//! The physical side of DocVault: a local filesystem implementation of
//! [`FileMirror`](docvault_core::traits::FileMirror) and the staging area
//! uploads wait in before they are committed into the mirror tree.

pub mod providers;
pub mod staging;

pub use providers::LocalFileMirror;
pub use staging::StagingArea;
