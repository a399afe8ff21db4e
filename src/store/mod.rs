//! SQLite persistence: player directory, settings, match archive.

mod archive;
mod config;
mod players;

pub use archive::{insert_finished_match, list_matches, MatchRecord};
pub use config::{get_int, list_settings, upsert_setting, Setting};
pub use players::{get_player, insert_player, list_active, set_status, sex_by_ids, update_player};

use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::collections::HashMap;

use crate::logic::{ConfigProvider, MatchArchive, PlayerDirectory};
use crate::models::{ArchivedMatch, MatchId, MatchParticipation, PlayerId, RotationError};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = include_str!("schema.sql");

/// Create all tables if missing. Safe to run on every startup.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to apply database schema")
}

/// Pooled handle to the SQLite database. Implements the collaborator traits
/// the rotation engine consumes.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = r2d2::Pool::new(manager).context("Failed to open database pool")?;
        let conn = pool.get().context("Failed to check out a connection")?;
        init_schema(&conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> Result<DbConn> {
        self.pool.get().context("Failed to check out a connection")
    }
}

impl ConfigProvider for Store {
    /// Missing keys fall back to the default; so does a failed read, with a
    /// warning, since the engine has no error channel for configuration.
    fn int_setting(&self, key: &str, default: i64) -> i64 {
        let value = self.conn().and_then(|conn| config::get_int(&conn, key));
        match value {
            Ok(Some(v)) => v,
            Ok(None) => default,
            Err(e) => {
                log::warn!("Falling back to default for setting '{}': {:#}", key, e);
                default
            }
        }
    }
}

impl PlayerDirectory for Store {
    /// Ids missing from the result are treated as "not female" by team
    /// formation, so a failed read degrades to unbalanced-but-legal teams.
    fn sex_by_ids(&self, ids: &[PlayerId]) -> HashMap<PlayerId, String> {
        let result = self
            .conn()
            .and_then(|conn| players::sex_by_ids(&conn, ids));
        match result {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Failed to look up sex categories: {:#}", e);
                HashMap::new()
            }
        }
    }
}

impl MatchArchive for Store {
    fn commit_match(
        &self,
        record: &ArchivedMatch,
        participations: &[MatchParticipation],
    ) -> Result<MatchId, RotationError> {
        let mut conn = self
            .conn()
            .map_err(|e| RotationError::ArchiveWrite(format!("{:#}", e)))?;
        archive::insert_finished_match(&mut conn, record, participations)
            .map_err(|e| RotationError::ArchiveWrite(format!("{:#}", e)))
    }
}
