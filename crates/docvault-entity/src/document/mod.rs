//! Document domain entities.

pub mod format;
pub mod model;

pub use format::DocumentFormat;
pub use model::{Document, DocumentListing};
