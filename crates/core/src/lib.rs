//! Tradebook Core - domain entities and data-access contracts.
//!
//! This crate is database-agnostic. It defines the entity models, the
//! error taxonomy, the read-side query-repository traits, and the
//! write-side command-repository / unit-of-work contracts that are
//! implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod errors;
pub mod positions;
pub mod trades;
pub mod uow;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
