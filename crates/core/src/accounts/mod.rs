//! Accounts module - domain model and query trait.

mod accounts_model;
mod accounts_traits;

// Re-export the public interface
pub use accounts_model::Account;
pub use accounts_traits::AccountQueryRepositoryTrait;
