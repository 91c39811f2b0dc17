//! Position domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model representing an open position.
///
/// `id` is `None` until the store has generated a key for the row.
/// Callers expect at most one open position per (account code,
/// security id) pair; this layer does not enforce that, so query before
/// deciding between add and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: Option<i64>,
    pub account_code: String,
    pub security_id: String,
    pub position_date: NaiveDate,
    pub market_value: Decimal,
}

impl Position {
    /// Creates a position that has not been persisted yet.
    pub fn new(
        account_code: impl Into<String>,
        security_id: impl Into<String>,
        position_date: NaiveDate,
        market_value: Decimal,
    ) -> Self {
        Self {
            id: None,
            account_code: account_code.into(),
            security_id: security_id.into(),
            position_date,
            market_value,
        }
    }

    /// Validates the position data.
    pub fn validate(&self) -> Result<()> {
        if self.account_code.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "account_code".to_string(),
            )));
        }
        if self.security_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "security_id".to_string(),
            )));
        }
        Ok(())
    }
}
