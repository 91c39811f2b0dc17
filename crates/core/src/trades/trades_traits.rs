//! Trade query trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::trades_model::Trade;
use crate::errors::Result;

/// Read-side contract for trades.
///
/// Implementations are stateless and safe for concurrent use: every call
/// acquires its own connection and releases it before returning.
#[async_trait]
pub trait TradeQueryRepositoryTrait: Send + Sync {
    /// Fetches the trades booked against an account on the given date.
    async fn get_trades_for_account(
        &self,
        account_code: &str,
        on: NaiveDate,
    ) -> Result<Vec<Trade>>;
}
