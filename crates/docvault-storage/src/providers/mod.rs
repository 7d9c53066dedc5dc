//! File mirror provider implementations.

pub mod local;

pub use local::LocalFileMirror;
