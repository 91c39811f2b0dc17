//! Trade domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a trade.
///
/// `id` is `None` until the store has generated a key for the row.
/// The account and security links are optional: a trade may be captured
/// before it is allocated to a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: Option<i64>,
    pub account_code: Option<String>,
    pub security_id: Option<String>,
    pub trade_date: NaiveDate,
    pub market_value: Decimal,
}

impl Trade {
    /// Creates an unallocated trade that has not been persisted yet.
    pub fn new(trade_date: NaiveDate, market_value: Decimal) -> Self {
        Self {
            id: None,
            account_code: None,
            security_id: None,
            trade_date,
            market_value,
        }
    }

    /// Creates a trade allocated to an account and security.
    pub fn allocated(
        account_code: impl Into<String>,
        security_id: impl Into<String>,
        trade_date: NaiveDate,
        market_value: Decimal,
    ) -> Self {
        Self {
            id: None,
            account_code: Some(account_code.into()),
            security_id: Some(security_id.into()),
            trade_date,
            market_value,
        }
    }

    /// Validates the trade data.
    pub fn validate(&self) -> Result<()> {
        if let Some(code) = &self.account_code {
            if code.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Account code cannot be blank when set".to_string(),
                )));
            }
        }
        if let Some(security) = &self.security_id {
            if security.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Security id cannot be blank when set".to_string(),
                )));
            }
        }
        Ok(())
    }
}
