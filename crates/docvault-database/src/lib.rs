//! # docvault-database
//!
//! SQLite connection management, the embedded schema, the transaction
//! coordinator, and the folder/document repositories that make up the
//! relational tree store.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod transaction;

pub use connection::DatabasePool;
pub use transaction::{TransactionCoordinator, UnitOfWork};
