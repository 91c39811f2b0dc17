//! Unit of work and command repositories.
//!
//! One `SqliteUnitOfWork` owns one session context: the pending change
//! set, the attached-entity bookkeeping, and the explicit-transaction
//! slot. Its command repositories are typed facades over that shared
//! context, built on first access and cached for the unit of work's
//! lifetime.
//!
//! The whole write side shares an `Rc<RefCell<..>>` and is therefore
//! `!Send`: one instance belongs to one task, which is what makes the
//! shared mutable context safe without any locks.

mod audit;
mod command_repository;
mod context;
mod unit_of_work;

pub use command_repository::{CommandModel, SqliteCommandRepository};
pub use context::EntityKey;
pub use unit_of_work::SqliteUnitOfWork;
