//! Core traits defined in `docvault-core` and implemented by other crates.

pub mod mirror;

pub use mirror::{FileMirror, StagedFile};
