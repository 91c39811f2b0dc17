//! Conversion helpers shared by the database models.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored decimal string, with a fallback through f64 for
/// scientific notation. Rows written by this crate always round-trip;
/// the fallback covers hand-edited data.
pub(crate) fn parse_decimal_tolerant(value: &str, field: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value).ok().and_then(Decimal::from_f64) {
            Some(d) => d,
            None => {
                log::error!(
                    "Failed to parse {} '{}' as Decimal (err: {}). Falling back to ZERO.",
                    field,
                    value,
                    e_decimal
                );
                Decimal::ZERO
            }
        },
    }
}

/// Parses a stored ISO date string.
pub(crate) fn parse_date_tolerant(value: &str, field: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse {} '{}' as date (err: {}). Falling back to epoch.",
            field,
            value,
            e
        );
        NaiveDate::default()
    })
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
