//! # docvault-core
//!
//! Core crate for DocVault. Contains the unified error system, typed
//! identifiers, configuration schemas, and the [`FileMirror`] trait that
//! storage backends implement.
//!
//! This crate has **no** internal dependencies on other DocVault crates.
//!
//! [`FileMirror`]: traits::FileMirror

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
