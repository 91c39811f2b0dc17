use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;

use tradebook_core::trades::{Trade, TradeQueryRepositoryTrait};
use tradebook_core::{Error, Result};

use super::model::TradeDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::trades;
use crate::utils::format_date;

/// Read-only repository for trades.
///
/// Stateless: every call checks out its own pooled connection inside the
/// blocking task, so concurrent calls never share mutable state.
pub struct TradeQueryRepository {
    pool: Arc<DbPool>,
}

impl TradeQueryRepository {
    /// Creates a new TradeQueryRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TradeQueryRepositoryTrait for TradeQueryRepository {
    async fn get_trades_for_account(
        &self,
        account_code: &str,
        on: NaiveDate,
    ) -> Result<Vec<Trade>> {
        let pool = Arc::clone(&self.pool);
        let code = account_code.to_string();
        let date = format_date(on);

        task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;

            let results = trades::table
                .filter(trades::account_code.eq(&code))
                .filter(trades::trade_date.eq(&date))
                .select(TradeDB::as_select())
                .order(trades::id.asc())
                .load::<TradeDB>(&mut conn)
                .into_core()?;

            Ok(results.into_iter().map(Trade::from).collect())
        })
        .await
        .map_err(|e| Error::Unexpected(format!("blocking query task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn create_test_pool() -> (Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (pool, temp_dir)
    }

    fn seed_account(pool: &Arc<DbPool>, code: &str) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        diesel::sql_query(format!(
            "INSERT INTO accounts (code, name, currency) VALUES ('{}', 'Test Account', 'USD')",
            code
        ))
        .execute(&mut conn)
        .expect("Failed to seed account");
    }

    fn seed_trade(pool: &Arc<DbPool>, code: &str, date: &str, value: &str) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        diesel::sql_query(format!(
            "INSERT INTO trades (account_code, security_id, trade_date, market_value) \
             VALUES ('{}', 'SEC-1', '{}', '{}')",
            code, date, value
        ))
        .execute(&mut conn)
        .expect("Failed to seed trade");
    }

    #[tokio::test]
    async fn test_get_trades_filters_by_account_and_date() {
        let (pool, _tmp) = create_test_pool();
        seed_account(&pool, "A1");
        seed_trade(&pool, "A1", "2024-06-03", "100");
        seed_trade(&pool, "A1", "2024-06-03", "250.25");
        seed_trade(&pool, "A1", "2024-06-04", "300");

        let repo = TradeQueryRepository::new(Arc::clone(&pool));
        let on = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let trades = repo.get_trades_for_account("A1", on).await.unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].market_value, dec!(100));
        assert_eq!(trades[1].market_value, dec!(250.25));
    }

    #[tokio::test]
    async fn test_get_trades_unknown_account_is_empty() {
        let (pool, _tmp) = create_test_pool();

        let repo = TradeQueryRepository::new(Arc::clone(&pool));
        let on = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(repo
            .get_trades_for_account("NOPE", on)
            .await
            .unwrap()
            .is_empty());
    }
}
