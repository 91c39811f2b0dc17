//! Position query trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::positions_model::Position;
use crate::errors::Result;

/// Read-side contract for positions.
///
/// Implementations are stateless and safe for concurrent use: every call
/// acquires its own connection and releases it before returning, so any
/// number of query calls may run concurrently without shared state.
#[async_trait]
pub trait PositionQueryRepositoryTrait: Send + Sync {
    /// Fetches the positions held by an account on the given date.
    async fn get_positions_for_account(
        &self,
        account_code: &str,
        on: NaiveDate,
    ) -> Result<Vec<Position>>;

    /// Fetches the position for (account, security), if any.
    ///
    /// Absence is a normal result, not an error.
    async fn get_position(
        &self,
        account_code: &str,
        security_id: &str,
    ) -> Result<Option<Position>>;
}
