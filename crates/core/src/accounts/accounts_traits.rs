//! Account query trait.
//!
//! The trait defines the read-side contract for accounts without any
//! database-specific types, allowing for different storage
//! implementations.

use async_trait::async_trait;

use super::accounts_model::Account;
use crate::errors::Result;

/// Read-side contract for accounts.
///
/// Implementations are stateless and safe for concurrent use: every call
/// acquires its own connection and releases it before returning.
#[async_trait]
pub trait AccountQueryRepositoryTrait: Send + Sync {
    /// Fetches all accounts, ordered by code.
    async fn get_accounts(&self) -> Result<Vec<Account>>;
}
