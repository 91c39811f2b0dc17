//! Per-connection audit context.
//!
//! The actor tag lives in the connection-scoped TEMP table
//! `audit_context` (created by the pool's connection customizer), where
//! the audit triggers pick it up. TEMP tables are invisible to other
//! connections, so a tag can never leak across concurrent commits.

use diesel::sql_types::Text;
use diesel::{RunQueryDsl, SqliteConnection};

use tradebook_core::Result;

use crate::errors::IntoCore;

/// Tags the connection with `actor` for the upcoming flush.
///
/// Always clears a previous tag first, so an anonymous commit on a
/// recycled pooled connection records NULL.
pub(crate) fn set_actor(conn: &mut SqliteConnection, actor: Option<&str>) -> Result<()> {
    diesel::sql_query("DELETE FROM audit_context")
        .execute(conn)
        .into_core()?;

    if let Some(actor) = actor {
        diesel::sql_query("INSERT INTO audit_context (actor) VALUES (?)")
            .bind::<Text, _>(actor)
            .execute(conn)
            .into_core()?;
        log::debug!("audit context set for actor '{}'", actor);
    }

    Ok(())
}

/// Removes the tag after a flush; runs on success and failure alike.
pub(crate) fn clear_actor(conn: &mut SqliteConnection) {
    if let Err(e) = diesel::sql_query("DELETE FROM audit_context").execute(conn) {
        log::warn!("failed to clear audit context: {}", e);
    }
}
