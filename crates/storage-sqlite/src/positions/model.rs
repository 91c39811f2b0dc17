//! Database model for positions.

use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use tradebook_core::positions::Position;
use tradebook_core::Result;

use crate::errors::IntoCore;
use crate::schema::positions;
use crate::uow::{CommandModel, EntityKey};
use crate::utils::{format_date, parse_date_tolerant, parse_decimal_tolerant};

/// Database model for positions.
///
/// Dates and decimals are stored as TEXT; the conversions below parse
/// them back into domain types.
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
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    #[diesel(skip_insertion)]
    pub id: i64,
    pub account_code: String,
    pub security_id: String,
    pub position_date: String,
    pub market_value: String,
}

// Conversion implementations
impl From<PositionDB> for Position {
    fn from(db: PositionDB) -> Self {
        Self {
            id: Some(db.id),
            account_code: db.account_code,
            security_id: db.security_id,
            position_date: parse_date_tolerant(&db.position_date, "position_date"),
            market_value: parse_decimal_tolerant(&db.market_value, "market_value"),
        }
    }
}

impl From<&Position> for PositionDB {
    fn from(domain: &Position) -> Self {
        Self {
            // skipped on insertion; the store generates it
            id: domain.id.unwrap_or_default(),
            account_code: domain.account_code.clone(),
            security_id: domain.security_id.clone(),
            position_date: format_date(domain.position_date),
            market_value: domain.market_value.to_string(),
        }
    }
}

impl CommandModel for Position {
    type Key = i64;

    const TABLE: &'static str = "positions";

    fn validate(&self) -> Result<()> {
        Position::validate(self)
    }

    fn entity_key(&self) -> Option<EntityKey> {
        self.id.map(EntityKey::Position)
    }

    fn find_by_key(conn: &mut SqliteConnection, key: &Self::Key) -> Result<Option<Self>> {
        let row = positions::table
            .select(PositionDB::as_select())
            .find(*key)
            .first::<PositionDB>(conn)
            .optional()
            .into_core()?;
        Ok(row.map(Position::from))
    }

    fn insert(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::insert_into(positions::table)
            .values(PositionDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn insert_many(conn: &mut SqliteConnection, entities: &[Self]) -> Result<usize> {
        let rows: Vec<PositionDB> = entities.iter().map(PositionDB::from).collect();
        diesel::insert_into(positions::table)
            .values(&rows)
            .execute(conn)
            .into_core()
    }

    fn update_all_fields(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::update(positions::table.find(entity.id.unwrap_or_default()))
            .set(PositionDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::delete(positions::table.find(entity.id.unwrap_or_default()))
            .execute(conn)
            .into_core()
    }
}
