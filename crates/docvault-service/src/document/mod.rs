//! Document mutations and reads.

pub mod service;

pub use service::{CreateDocumentRequest, DocumentService, DocumentWithContent, MoveDocumentRequest};
