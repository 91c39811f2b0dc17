//! The SQLite unit of work.

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;

use tradebook_core::accounts::Account;
use tradebook_core::positions::Position;
use tradebook_core::trades::Trade;
use tradebook_core::uow::{CommandRepository, UnitOfWorkTrait};
use tradebook_core::Result;

use super::command_repository::SqliteCommandRepository;
use super::context::SessionContext;
use crate::db::DbPool;

/// Unit of work over one SQLite session context.
///
/// Create one instance per logical business operation, stage mutations
/// through the typed command repositories, and commit once. The command
/// repositories are built on first access and cached, all bound to the
/// same context.
///
/// The unit of work composes a session handle rather than subclassing
/// anything store-side: the context stays private and the typed facades
/// are the only way to reach it. It is `!Send` by construction; to write
/// from several tasks, give each task its own unit of work.
pub struct SqliteUnitOfWork {
    ctx: Rc<RefCell<SessionContext>>,
    accounts: OnceCell<SqliteCommandRepository<Account>>,
    positions: OnceCell<SqliteCommandRepository<Position>>,
    trades: OnceCell<SqliteCommandRepository<Trade>>,
}

impl SqliteUnitOfWork {
    /// Creates a unit of work drawing connections from `pool`.
    ///
    /// No connection is held while idle: the anonymous commit path
    /// borrows one per flush, and `begin_transaction` checks one out
    /// until the transaction is resolved.
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            ctx: Rc::new(RefCell::new(SessionContext::new(pool))),
            accounts: OnceCell::new(),
            positions: OnceCell::new(),
            trades: OnceCell::new(),
        }
    }
}

#[async_trait(?Send)]
impl UnitOfWorkTrait for SqliteUnitOfWork {
    fn accounts(&self) -> &dyn CommandRepository<Account, Key = String> {
        self.accounts
            .get_or_init(|| SqliteCommandRepository::new(Rc::clone(&self.ctx)))
    }

    fn positions(&self) -> &dyn CommandRepository<Position, Key = i64> {
        self.positions
            .get_or_init(|| SqliteCommandRepository::new(Rc::clone(&self.ctx)))
    }

    fn trades(&self) -> &dyn CommandRepository<Trade, Key = i64> {
        self.trades
            .get_or_init(|| SqliteCommandRepository::new(Rc::clone(&self.ctx)))
    }

    async fn commit(&self) -> Result<usize> {
        self.ctx.borrow_mut().commit(None)
    }

    async fn commit_by(&self, actor: &str) -> Result<usize> {
        self.ctx.borrow_mut().commit(Some(actor))
    }

    fn begin_transaction(&self) -> Result<()> {
        self.ctx.borrow_mut().begin_transaction()
    }

    fn commit_transaction(&self) -> Result<()> {
        self.ctx.borrow_mut().commit_transaction()
    }

    fn rollback_transaction(&self) -> Result<()> {
        self.ctx.borrow_mut().rollback_transaction()
    }

    fn has_open_transaction(&self) -> bool {
        self.ctx.borrow().has_open_transaction()
    }

    fn pending_count(&self) -> usize {
        self.ctx.borrow().pending_len()
    }
}
