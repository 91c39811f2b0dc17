//! Write-side contracts: command repositories and the unit of work.
//!
//! These traits define the staging/commit coordination without any
//! database-specific types. A unit of work owns one transactional
//! context; its command repositories are typed views over that context
//! and only ever stage work — nothing reaches the store until the unit
//! of work commits.

use async_trait::async_trait;

use crate::accounts::Account;
use crate::errors::Result;
use crate::positions::Position;
use crate::trades::Trade;

/// Write-side contract for one entity type, operating against the
/// owning unit of work's shared transactional context.
///
/// Every method only mutates the pending change set; no method commits.
/// Detached entities passed to [`CommandRepository::update`] or
/// [`CommandRepository::remove`] are attached silently — callers are not
/// required to call [`CommandRepository::find`] first.
///
/// Unlike the query repositories, command repositories share one mutable
/// context and are not safe for concurrent invocation. Implementations
/// enforce this structurally rather than with locks.
pub trait CommandRepository<E> {
    /// Primary-key type of the entity.
    type Key;

    /// Looks the entity up by primary key.
    ///
    /// Reads through the open explicit transaction when one is active,
    /// otherwise through a connection of its own. Absence is a normal
    /// result. The returned entity is detached: a later `update` or
    /// `remove` call re-attaches it before marking state.
    fn find(&self, key: &Self::Key) -> Result<Option<E>>;

    /// Stages the entity for insertion.
    fn add(&self, entity: E) -> Result<()>;

    /// Stages a batch of entities for insertion as one multi-row write.
    ///
    /// Validation failures surface before anything is staged.
    fn add_range(&self, entities: Vec<E>) -> Result<()>;

    /// Stages the entity for deletion, attaching it first if needed.
    ///
    /// Fails with a validation error if the entity has no identity yet.
    fn remove(&self, entity: E) -> Result<()>;

    /// Stages a batch for deletion.
    ///
    /// Change detection is paused for the duration of the loop and
    /// restored on every exit path, including a failure mid-loop.
    fn remove_range(&self, entities: Vec<E>) -> Result<()>;

    /// Stages a full update of the entity (all fields written),
    /// attaching it first if needed.
    ///
    /// Fails with a validation error if the entity has no identity yet.
    fn update(&self, entity: E) -> Result<()>;

    /// Stages a batch of full updates; change detection is paused as in
    /// [`CommandRepository::remove_range`].
    fn update_range(&self, entities: Vec<E>) -> Result<()>;
}

/// A unit of work batches mutations staged through its command
/// repositories and flushes them to the store as one atomic transaction.
///
/// One instance is created per logical business operation and owns one
/// transactional context for its lifetime. The typed accessors hand out
/// command repositories bound to that context, constructed on first
/// access and cached. Dropping the unit of work releases the underlying
/// connection and discards any uncommitted staged changes.
///
/// Lifecycle: `Idle -> TransactionOpen` (via
/// [`UnitOfWorkTrait::begin_transaction`]) `-> Idle` (via
/// [`UnitOfWorkTrait::commit_transaction`] or
/// [`UnitOfWorkTrait::rollback_transaction`]). A commit issued while no
/// explicit transaction is open runs as a self-contained
/// open-flush-close transaction and never touches that state machine.
#[async_trait(?Send)]
pub trait UnitOfWorkTrait {
    /// Command repository for accounts.
    fn accounts(&self) -> &dyn CommandRepository<Account, Key = String>;

    /// Command repository for positions.
    fn positions(&self) -> &dyn CommandRepository<Position, Key = i64>;

    /// Command repository for trades.
    fn trades(&self) -> &dyn CommandRepository<Trade, Key = i64>;

    /// Flushes the pending change set as one atomic transaction and
    /// returns the number of affected rows.
    ///
    /// With no explicit transaction open this acquires a connection,
    /// flushes, and releases the connection on every exit path. With an
    /// explicit transaction open it flushes within that transaction and
    /// leaves the connection open. An empty pending set commits
    /// successfully as a no-op.
    ///
    /// All calls touching one unit of work must be serialized; a second
    /// in-flight commit against the same instance is a caller error, and
    /// implementations may rule it out structurally (e.g. by not being
    /// `Send`).
    async fn commit(&self) -> Result<usize>;

    /// Like [`UnitOfWorkTrait::commit`], additionally tagging the
    /// commit's connection with `actor` so server-side audit logic can
    /// attribute the change. The tag is applied strictly before the
    /// flush and never outlives the commit.
    async fn commit_by(&self, actor: &str) -> Result<usize>;

    /// Opens an explicit transaction scope.
    ///
    /// Fails with a transaction-state error if one is already open.
    fn begin_transaction(&self) -> Result<()>;

    /// Commits the explicit transaction.
    ///
    /// Fails with a transaction-state error if none is open. Staged
    /// operations that were never flushed stay staged.
    fn commit_transaction(&self) -> Result<()>;

    /// Rolls back the explicit transaction and discards the pending
    /// change set.
    ///
    /// Fails with a transaction-state error if none is open.
    fn rollback_transaction(&self) -> Result<()>;

    /// Whether an explicit transaction is currently open.
    fn has_open_transaction(&self) -> bool;

    /// Number of staged operations that have not been flushed yet.
    fn pending_count(&self) -> usize;
}
