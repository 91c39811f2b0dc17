use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;

use tradebook_core::positions::{Position, PositionQueryRepositoryTrait};
use tradebook_core::{Error, Result};

use super::model::PositionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::positions;
use crate::utils::format_date;

/// Read-only repository for positions.
///
/// Stateless: every call checks out its own pooled connection inside the
/// blocking task, so concurrent calls never share mutable state.
pub struct PositionQueryRepository {
    pool: Arc<DbPool>,
}

impl PositionQueryRepository {
    /// Creates a new PositionQueryRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PositionQueryRepositoryTrait for PositionQueryRepository {
    async fn get_positions_for_account(
        &self,
        account_code: &str,
        on: NaiveDate,
    ) -> Result<Vec<Position>> {
        let pool = Arc::clone(&self.pool);
        let code = account_code.to_string();
        let date = format_date(on);

        task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;

            let results = positions::table
                .filter(positions::account_code.eq(&code))
                .filter(positions::position_date.eq(&date))
                .select(PositionDB::as_select())
                .order(positions::security_id.asc())
                .load::<PositionDB>(&mut conn)
                .into_core()?;

            Ok(results.into_iter().map(Position::from).collect())
        })
        .await
        .map_err(|e| Error::Unexpected(format!("blocking query task failed: {}", e)))?
    }

    async fn get_position(
        &self,
        account_code: &str,
        security_id: &str,
    ) -> Result<Option<Position>> {
        let pool = Arc::clone(&self.pool);
        let code = account_code.to_string();
        let security = security_id.to_string();

        task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;

            // Callers keep at most one open position per (account,
            // security); the latest date wins if that expectation is
            // ever violated upstream.
            let row = positions::table
                .filter(positions::account_code.eq(&code))
                .filter(positions::security_id.eq(&security))
                .select(PositionDB::as_select())
                .order(positions::position_date.desc())
                .first::<PositionDB>(&mut conn)
                .optional()
                .into_core()?;

            Ok(row.map(Position::from))
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

    fn seed_position(pool: &Arc<DbPool>, code: &str, security: &str, date: &str, value: &str) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        diesel::sql_query(format!(
            "INSERT INTO positions (account_code, security_id, position_date, market_value) \
             VALUES ('{}', '{}', '{}', '{}')",
            code, security, date, value
        ))
        .execute(&mut conn)
        .expect("Failed to seed position");
    }

    #[tokio::test]
    async fn test_get_positions_filters_by_account_and_date() {
        let (pool, _tmp) = create_test_pool();
        seed_account(&pool, "A1");
        seed_account(&pool, "B2");
        seed_position(&pool, "A1", "SEC-1", "2024-06-03", "100.50");
        seed_position(&pool, "A1", "SEC-2", "2024-06-03", "200");
        seed_position(&pool, "A1", "SEC-3", "2024-06-04", "300");
        seed_position(&pool, "B2", "SEC-1", "2024-06-03", "400");

        let repo = PositionQueryRepository::new(Arc::clone(&pool));
        let on = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let positions = repo.get_positions_for_account("A1", on).await.unwrap();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].security_id, "SEC-1");
        assert_eq!(positions[0].market_value, dec!(100.50));
        assert_eq!(positions[1].security_id, "SEC-2");
    }

    #[tokio::test]
    async fn test_get_position_absent_is_none_not_error() {
        let (pool, _tmp) = create_test_pool();
        seed_account(&pool, "A1");

        let repo = PositionQueryRepository::new(Arc::clone(&pool));
        let found = repo.get_position("A1", "SEC-404").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queries_are_independent() {
        let (pool, _tmp) = create_test_pool();
        seed_account(&pool, "A1");
        seed_account(&pool, "B2");
        seed_position(&pool, "A1", "SEC-1", "2024-06-03", "100");
        seed_position(&pool, "B2", "SEC-2", "2024-06-03", "200");

        let repo_a = PositionQueryRepository::new(Arc::clone(&pool));
        let repo_b = PositionQueryRepository::new(Arc::clone(&pool));
        let on = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let (for_a, for_b, single) = tokio::join!(
            repo_a.get_positions_for_account("A1", on),
            repo_b.get_positions_for_account("B2", on),
            repo_a.get_position("B2", "SEC-2"),
        );

        let for_a = for_a.unwrap();
        let for_b = for_b.unwrap();
        let single = single.unwrap().unwrap();

        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].account_code, "A1");
        assert_eq!(for_b.len(), 1);
        assert_eq!(for_b[0].account_code, "B2");
        assert_eq!(single.market_value, dec!(200));
    }
}
