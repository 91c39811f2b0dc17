//! SQLite storage implementation for Tradebook.
//!
//! This crate provides all database-related functionality using Diesel
//! ORM with SQLite. It implements the repository and unit-of-work traits
//! defined in `tradebook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations (including the audit log and its triggers)
//! - Query-repository implementations for all domain entities
//! - The unit of work and its per-entity command repositories
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel
//! dependencies exist. `core` is database-agnostic and works with
//! traits.
//!
//! ```text
//!          core (domain contracts)
//!                   │
//!                   ▼
//!          storage-sqlite (this crate)
//!                   │
//!                   ▼
//!               SQLite DB
//! ```
//!
//! Read and write sides are deliberately asymmetric: query repositories
//! are stateless and check out a pooled connection per call, while the
//! unit of work owns one session context for its whole lifetime and is
//! `!Send` by construction.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod positions;
pub mod trades;
pub mod uow;

mod utils;

// Re-export database utilities
pub use db::{create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export the write side
pub use uow::{SqliteCommandRepository, SqliteUnitOfWork};

// Re-export from tradebook-core for convenience
pub use tradebook_core::errors::{DatabaseError, Error, Result};
