use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;

use tradebook_core::accounts::{Account, AccountQueryRepositoryTrait};
use tradebook_core::{Error, Result};

use super::model::AccountDB;
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::accounts;

/// Read-only repository for accounts.
///
/// Stateless: every call checks out its own pooled connection inside the
/// blocking task, so concurrent calls never share mutable state.
pub struct AccountQueryRepository {
    pool: Arc<DbPool>,
}

impl AccountQueryRepository {
    /// Creates a new AccountQueryRepository instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountQueryRepositoryTrait for AccountQueryRepository {
    async fn get_accounts(&self) -> Result<Vec<Account>> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;

            let results = accounts::table
                .select(AccountDB::as_select())
                .order(accounts::code.asc())
                .load::<AccountDB>(&mut conn)
                .into_core()?;

            Ok(results.into_iter().map(Account::from).collect())
        })
        .await
        .map_err(|e| Error::Unexpected(format!("blocking query task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use tempfile::tempdir;

    async fn create_test_repository() -> (AccountQueryRepository, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");

        let repo = AccountQueryRepository::new(Arc::clone(&pool));
        (repo, pool, temp_dir)
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

    #[tokio::test]
    async fn test_get_accounts_returns_all_ordered_by_code() {
        let (repo, pool, _tmp) = create_test_repository().await;
        seed_account(&pool, "B2");
        seed_account(&pool, "A1");

        let accounts = repo.get_accounts().await.unwrap();
        let codes: Vec<&str> = accounts.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2"]);
    }

    #[tokio::test]
    async fn test_get_accounts_empty_store() {
        let (repo, _pool, _tmp) = create_test_repository().await;
        assert!(repo.get_accounts().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_concurrent_reads_complete_independently() {
        let (repo, pool, _tmp) = create_test_repository().await;
        seed_account(&pool, "A1");
        seed_account(&pool, "B2");

        let reads = futures::future::join_all((0..8).map(|_| repo.get_accounts())).await;

        for accounts in reads {
            let accounts = accounts.unwrap();
            assert_eq!(accounts.len(), 2);
            assert_eq!(accounts[0].code, "A1");
        }
    }
}
