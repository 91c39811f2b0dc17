//! Database model for trades.

use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use tradebook_core::trades::Trade;
use tradebook_core::Result;

use crate::errors::IntoCore;
use crate::schema::trades;
use crate::uow::{CommandModel, EntityKey};
use crate::utils::{format_date, parse_date_tolerant, parse_decimal_tolerant};

/// Database model for trades.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Default,
)]
#[diesel(table_name = crate::schema::trades)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TradeDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub account_code: Option<String>,
    pub security_id: Option<String>,
    pub trade_date: String,
    pub market_value: String,
}

// Conversion implementations
impl From<TradeDB> for Trade {
    fn from(db: TradeDB) -> Self {
        Self {
            id: Some(db.id),
            account_code: db.account_code,
            security_id: db.security_id,
            trade_date: parse_date_tolerant(&db.trade_date, "trade_date"),
            market_value: parse_decimal_tolerant(&db.market_value, "market_value"),
        }
    }
}

impl From<&Trade> for TradeDB {
    fn from(domain: &Trade) -> Self {
        Self {
            // skipped on insertion; the store generates it
            id: domain.id.unwrap_or_default(),
            account_code: domain.account_code.clone(),
            security_id: domain.security_id.clone(),
            trade_date: format_date(domain.trade_date),
            market_value: domain.market_value.to_string(),
        }
    }
}

impl CommandModel for Trade {
    type Key = i64;

    const TABLE: &'static str = "trades";

    fn validate(&self) -> Result<()> {
        Trade::validate(self)
    }

    fn entity_key(&self) -> Option<EntityKey> {
        self.id.map(EntityKey::Trade)
    }

    fn find_by_key(conn: &mut SqliteConnection, key: &Self::Key) -> Result<Option<Self>> {
        let row = trades::table
            .select(TradeDB::as_select())
            .find(*key)
            .first::<TradeDB>(conn)
            .optional()
            .into_core()?;
        Ok(row.map(Trade::from))
    }

    fn insert(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::insert_into(trades::table)
            .values(TradeDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn insert_many(conn: &mut SqliteConnection, entities: &[Self]) -> Result<usize> {
        let rows: Vec<TradeDB> = entities.iter().map(TradeDB::from).collect();
        diesel::insert_into(trades::table)
            .values(&rows)
            .execute(conn)
            .into_core()
    }

    fn update_all_fields(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::update(trades::table.find(entity.id.unwrap_or_default()))
            .set(TradeDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::delete(trades::table.find(entity.id.unwrap_or_default()))
            .execute(conn)
            .into_core()
    }
}
