//! The shared session context behind a unit of work.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::{Connection, SqliteConnection};

use tradebook_core::{Error, Result};

use super::audit;
use crate::db::{get_connection, DbConnection, DbPool};
use crate::errors::{IntoCore, StorageError};

/// Primary key of an attached entity, across all entity types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Account(String),
    Position(i64),
    Trade(i64),
}

/// A staged write, replayable against any connection.
///
/// Jobs are `Fn` rather than `FnOnce` so that a failed flush leaves the
/// pending change set intact.
pub(crate) type WriteJob = Box<dyn Fn(&mut SqliteConnection) -> Result<usize>>;

pub(crate) struct PendingOp {
    pub(crate) op: &'static str,
    pub(crate) table: &'static str,
    pub(crate) job: WriteJob,
}

/// The single mutable resource behind one unit of work: the pending
/// change set, attachment bookkeeping, and the explicit-transaction
/// slot. Command repositories hold a non-owning `Rc` handle to it.
pub(crate) struct SessionContext {
    pool: Arc<DbPool>,
    pending: Vec<PendingOp>,
    attached: HashSet<EntityKey>,
    auto_detect: bool,
    tx_conn: Option<DbConnection>,
}

impl SessionContext {
    pub(crate) fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            pending: Vec::new(),
            attached: HashSet::new(),
            auto_detect: true,
            tx_conn: None,
        }
    }

    pub(crate) fn pool(&self) -> Arc<DbPool> {
        Arc::clone(&self.pool)
    }

    pub(crate) fn stage(&mut self, op: PendingOp) {
        log::debug!("staging {} on {}", op.op, op.table);
        self.pending.push(op);
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Marks the key as attached; returns false if it already was.
    pub(crate) fn attach(&mut self, key: EntityKey) -> bool {
        self.attached.insert(key)
    }

    pub(crate) fn is_attached(&self, key: &EntityKey) -> bool {
        self.attached.contains(key)
    }

    pub(crate) fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    pub(crate) fn tx_conn_mut(&mut self) -> Option<&mut DbConnection> {
        self.tx_conn.as_mut()
    }

    pub(crate) fn has_open_transaction(&self) -> bool {
        self.tx_conn.is_some()
    }

    /// Flushes the pending change set; see the unit-of-work contract for
    /// the two commit modes.
    pub(crate) fn commit(&mut self, actor: Option<&str>) -> Result<usize> {
        if self.pending.is_empty() {
            log::debug!("commit with no staged changes; nothing to flush");
            return Ok(0);
        }

        let affected = if self.tx_conn.is_some() {
            self.flush_in_open_transaction(actor)?
        } else {
            self.flush_anonymous(actor)?
        };

        // A failed flush returns above and keeps the change set staged.
        self.pending.clear();
        self.attached.clear();
        log::debug!("commit flushed {} row(s)", affected);
        Ok(affected)
    }

    /// Flush within the caller-managed transaction; the connection stays
    /// open until the transaction is resolved.
    fn flush_in_open_transaction(&mut self, actor: Option<&str>) -> Result<usize> {
        let Self {
            pending, tx_conn, ..
        } = self;
        let conn = tx_conn.as_mut().expect("caller checked tx_conn");

        audit::set_actor(conn, actor)?;
        let result = apply_pending(conn, pending);
        audit::clear_actor(conn);
        result
    }

    /// Self-contained commit: check a connection out, flush inside one
    /// immediate transaction, and return it to the pool on every path.
    fn flush_anonymous(&mut self, actor: Option<&str>) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let pending = &self.pending;

        audit::set_actor(&mut conn, actor)?;
        let result = conn
            .immediate_transaction::<_, StorageError, _>(|c| {
                apply_pending(c, pending).map_err(StorageError::from)
            })
            .map_err(Error::from);
        audit::clear_actor(&mut conn);
        result
    }

    pub(crate) fn begin_transaction(&mut self) -> Result<()> {
        if self.tx_conn.is_some() {
            return Err(Error::TransactionState(
                "a transaction is already open on this unit of work".to_string(),
            ));
        }

        let mut conn = get_connection(&self.pool)?;
        AnsiTransactionManager::begin_transaction(&mut *conn).into_core()?;
        self.tx_conn = Some(conn);
        log::debug!("explicit transaction opened");
        Ok(())
    }

    pub(crate) fn commit_transaction(&mut self) -> Result<()> {
        let mut conn = self.tx_conn.take().ok_or_else(|| {
            Error::TransactionState("no transaction is open on this unit of work".to_string())
        })?;

        AnsiTransactionManager::commit_transaction(&mut *conn).into_core()?;
        log::debug!("explicit transaction committed");
        Ok(())
    }

    pub(crate) fn rollback_transaction(&mut self) -> Result<()> {
        let mut conn = self.tx_conn.take().ok_or_else(|| {
            Error::TransactionState("no transaction is open on this unit of work".to_string())
        })?;

        let result = AnsiTransactionManager::rollback_transaction(&mut *conn).into_core();
        if !self.pending.is_empty() {
            log::debug!(
                "rollback discarded {} staged change(s)",
                self.pending.len()
            );
        }
        self.pending.clear();
        self.attached.clear();
        result
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        if let Some(mut conn) = self.tx_conn.take() {
            log::error!("unit of work dropped with an unresolved explicit transaction; rolling back");
            if let Err(e) = AnsiTransactionManager::rollback_transaction(&mut *conn) {
                log::error!("rollback of unresolved transaction failed: {}", e);
            }
        }
        if !self.pending.is_empty() {
            log::debug!(
                "discarding {} uncommitted staged change(s)",
                self.pending.len()
            );
        }
    }
}

fn apply_pending(conn: &mut SqliteConnection, pending: &[PendingOp]) -> Result<usize> {
    let mut affected = 0;
    for op in pending {
        let rows = (op.job)(conn)?;
        log::debug!("applied {} on {} ({} row(s))", op.op, op.table, rows);
        affected += rows;
    }
    Ok(affected)
}

/// Pauses automatic change detection for the lifetime of the guard,
/// restoring the previous setting on every exit path.
pub(crate) struct DetectionPause {
    ctx: Rc<RefCell<SessionContext>>,
    prev: bool,
}

impl DetectionPause {
    pub(crate) fn new(ctx: &Rc<RefCell<SessionContext>>) -> Self {
        let prev = {
            let mut guard = ctx.borrow_mut();
            let prev = guard.auto_detect;
            guard.auto_detect = false;
            prev
        };
        Self {
            ctx: Rc::clone(ctx),
            prev,
        }
    }
}

impl Drop for DetectionPause {
    fn drop(&mut self) {
        self.ctx.borrow_mut().auto_detect = self.prev;
    }
}
