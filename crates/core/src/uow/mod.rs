//! Unit-of-work module - write-side contracts.

mod uow_traits;

// Re-export the public interface
pub use uow_traits::{CommandRepository, UnitOfWorkTrait};
