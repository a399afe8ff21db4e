//! Named integer settings (team size, win limit, and whatever else the
//! frontend wants to keep).

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// One configuration row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: i64,
}

pub fn get_int(conn: &Connection, key: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to read setting")
}

pub fn upsert_setting(conn: &Connection, key: &str, value: i64) -> Result<Setting> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .context("Failed to upsert setting")?;
    Ok(Setting {
        key: key.to_string(),
        value,
    })
}

pub fn list_settings(conn: &Connection) -> Result<Vec<Setting>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Setting {
                key: row.get(0)?,
                value: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list settings")?;
    Ok(rows)
}
