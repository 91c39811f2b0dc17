//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use tradebook_core::accounts::Account;
use tradebook_core::Result;

use crate::errors::IntoCore;
use crate::schema::accounts;
use crate::uow::{CommandModel, EntityKey};

/// Database model for accounts
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
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub code: String,
    pub name: String,
    pub currency: String,
    #[diesel(skip_insertion)]
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            code: db.code,
            name: db.name,
            currency: db.currency,
            created_at: db.created_at,
        }
    }
}

impl From<&Account> for AccountDB {
    fn from(domain: &Account) -> Self {
        Self {
            code: domain.code.clone(),
            name: domain.name.clone(),
            currency: domain.currency.clone(),
            // skipped on insertion; the store fills it in
            created_at: domain.created_at,
        }
    }
}

impl CommandModel for Account {
    type Key = String;

    const TABLE: &'static str = "accounts";

    fn validate(&self) -> Result<()> {
        Account::validate(self)
    }

    fn entity_key(&self) -> Option<EntityKey> {
        Some(EntityKey::Account(self.code.clone()))
    }

    fn find_by_key(conn: &mut SqliteConnection, key: &Self::Key) -> Result<Option<Self>> {
        let row = accounts::table
            .select(AccountDB::as_select())
            .find(key.as_str())
            .first::<AccountDB>(conn)
            .optional()
            .into_core()?;
        Ok(row.map(Account::from))
    }

    fn insert(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::insert_into(accounts::table)
            .values(AccountDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn insert_many(conn: &mut SqliteConnection, entities: &[Self]) -> Result<usize> {
        let rows: Vec<AccountDB> = entities.iter().map(AccountDB::from).collect();
        diesel::insert_into(accounts::table)
            .values(&rows)
            .execute(conn)
            .into_core()
    }

    fn update_all_fields(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::update(accounts::table.find(entity.code.as_str()))
            .set(AccountDB::from(entity))
            .execute(conn)
            .into_core()
    }

    fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<usize> {
        diesel::delete(accounts::table.find(entity.code.as_str()))
            .execute(conn)
            .into_core()
    }
}
