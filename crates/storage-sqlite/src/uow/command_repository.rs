//! Generic command-repository facade over the session context.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use diesel::SqliteConnection;

use tradebook_core::errors::ValidationError;
use tradebook_core::uow::CommandRepository;
use tradebook_core::{Error, Result};

use super::context::{DetectionPause, EntityKey, PendingOp, SessionContext};
use crate::db::get_connection;

/// Diesel-level mapping an entity type needs to participate in the
/// generic command repository: keyed find plus full-row insert, update
/// and delete. Implemented next to each entity's database model.
pub trait CommandModel: Clone + 'static {
    /// Primary-key type of the entity.
    type Key: Clone + 'static;

    /// Table name, used for logging and attachment bookkeeping.
    const TABLE: &'static str;

    fn validate(&self) -> Result<()>;

    /// The entity's attachment key; `None` while the store has not
    /// generated an identity yet.
    fn entity_key(&self) -> Option<EntityKey>;

    fn find_by_key(conn: &mut SqliteConnection, key: &Self::Key) -> Result<Option<Self>>;
    fn insert(conn: &mut SqliteConnection, entity: &Self) -> Result<usize>;
    fn insert_many(conn: &mut SqliteConnection, entities: &[Self]) -> Result<usize>;
    fn update_all_fields(conn: &mut SqliteConnection, entity: &Self) -> Result<usize>;
    fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<usize>;
}

/// Write-side facade for one entity type, bound to the owning unit of
/// work's session context.
///
/// Constructed lazily by the unit of work and cached for its lifetime.
/// Holds an `Rc` to the shared context, so the facade (like the unit of
/// work itself) is `!Send`.
pub struct SqliteCommandRepository<E> {
    ctx: Rc<RefCell<SessionContext>>,
    _entity: PhantomData<E>,
}

impl<E: CommandModel> SqliteCommandRepository<E> {
    pub(crate) fn new(ctx: Rc<RefCell<SessionContext>>) -> Self {
        Self {
            ctx,
            _entity: PhantomData,
        }
    }

    fn stage_insert(&self, entity: E) -> Result<()> {
        entity.validate()?;

        let mut ctx = self.ctx.borrow_mut();
        if ctx.auto_detect() {
            if let Some(key) = entity.entity_key() {
                ctx.attach(key);
            }
        }
        ctx.stage(PendingOp {
            op: "insert",
            table: E::TABLE,
            job: Box::new(move |conn| E::insert(conn, &entity)),
        });
        Ok(())
    }

    fn stage_update(&self, entity: E) -> Result<()> {
        entity.validate()?;
        let key = entity.entity_key().ok_or_else(missing_identity::<E>)?;

        let mut ctx = self.ctx.borrow_mut();
        if ctx.auto_detect() && !ctx.is_attached(&key) {
            // detached entity: attach silently, then mark every field
            ctx.attach(key);
        }
        ctx.stage(PendingOp {
            op: "update",
            table: E::TABLE,
            job: Box::new(move |conn| E::update_all_fields(conn, &entity)),
        });
        Ok(())
    }

    fn stage_remove(&self, entity: E) -> Result<()> {
        let key = entity.entity_key().ok_or_else(missing_identity::<E>)?;

        let mut ctx = self.ctx.borrow_mut();
        if ctx.auto_detect() && !ctx.is_attached(&key) {
            // detached entity: attach silently, then mark for removal
            ctx.attach(key);
        }
        ctx.stage(PendingOp {
            op: "delete",
            table: E::TABLE,
            job: Box::new(move |conn| E::delete(conn, &entity)),
        });
        Ok(())
    }
}

fn missing_identity<E: CommandModel>() -> Error {
    Error::Validation(ValidationError::InvalidInput(format!(
        "cannot stage a {} entity that has no identity yet",
        E::TABLE
    )))
}

impl<E: CommandModel> CommandRepository<E> for SqliteCommandRepository<E> {
    type Key = E::Key;

    fn find(&self, key: &Self::Key) -> Result<Option<E>> {
        let mut ctx = self.ctx.borrow_mut();
        match ctx.tx_conn_mut() {
            // read through the open explicit transaction
            Some(conn) => E::find_by_key(conn, key),
            None => {
                let pool = ctx.pool();
                drop(ctx);
                let mut conn = get_connection(&pool)?;
                E::find_by_key(&mut conn, key)
            }
        }
    }

    fn add(&self, entity: E) -> Result<()> {
        self.stage_insert(entity)
    }

    fn add_range(&self, entities: Vec<E>) -> Result<()> {
        // fail fast: nothing is staged unless the whole batch validates
        for entity in &entities {
            entity.validate()?;
        }

        let _pause = DetectionPause::new(&self.ctx);
        let mut ctx = self.ctx.borrow_mut();
        ctx.stage(PendingOp {
            op: "insert-many",
            table: E::TABLE,
            job: Box::new(move |conn| E::insert_many(conn, &entities)),
        });
        Ok(())
    }

    fn remove(&self, entity: E) -> Result<()> {
        self.stage_remove(entity)
    }

    fn remove_range(&self, entities: Vec<E>) -> Result<()> {
        let _pause = DetectionPause::new(&self.ctx);
        for entity in entities {
            self.stage_remove(entity)?;
        }
        Ok(())
    }

    fn update(&self, entity: E) -> Result<()> {
        self.stage_update(entity)
    }

    fn update_range(&self, entities: Vec<E>) -> Result<()> {
        let _pause = DetectionPause::new(&self.ctx);
        for entity in entities {
            self.stage_update(entity)?;
        }
        Ok(())
    }
}
