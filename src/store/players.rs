//! Player directory queries.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;

use crate::models::{Player, PlayerId, PlayerPatch, StatusPatch};

pub fn insert_player(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "INSERT INTO players (id, name, whatsapp, sex, avatar, is_active, is_present, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
    conn.execute(
        sql,
        params![
            player.id,
            player.name,
            player.whatsapp,
            player.sex,
            player.avatar,
            player.is_active,
            player.is_present,
            player.created_at,
        ],
    )
    .context("Failed to insert player")?;
    Ok(())
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        whatsapp: row.get(2)?,
        sex: row.get(3)?,
        avatar: row.get(4)?,
        is_active: row.get(5)?,
        is_present: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const PLAYER_COLUMNS: &str = "id, name, whatsapp, sex, avatar, is_active, is_present, created_at";

pub fn get_player(conn: &Connection, id: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE id = ?1", PLAYER_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query_map(params![id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read player")?;
    Ok(rows.pop())
}

pub fn list_active(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {} FROM players WHERE is_active = 1 ORDER BY name",
        PLAYER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list active players")?;
    Ok(rows)
}

/// Apply a partial profile update. Returns the updated player, or `None` if
/// the id is unknown.
pub fn update_player(conn: &Connection, id: &str, patch: &PlayerPatch) -> Result<Option<Player>> {
    let Some(mut player) = get_player(conn, id)? else {
        return Ok(None);
    };
    patch.apply(&mut player);
    write_player(conn, &player)?;
    Ok(Some(player))
}

/// Apply an activation/presence update. Returns the updated player, or
/// `None` if the id is unknown.
pub fn set_status(conn: &Connection, id: &str, patch: &StatusPatch) -> Result<Option<Player>> {
    let Some(mut player) = get_player(conn, id)? else {
        return Ok(None);
    };
    patch.apply(&mut player);
    write_player(conn, &player)?;
    Ok(Some(player))
}

fn write_player(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "UPDATE players SET name = ?2, whatsapp = ?3, sex = ?4, avatar = ?5, is_active = ?6, is_present = ?7 WHERE id = ?1";
    conn.execute(
        sql,
        params![
            player.id,
            player.name,
            player.whatsapp,
            player.sex,
            player.avatar,
            player.is_active,
            player.is_present,
        ],
    )
    .context("Failed to update player")?;
    Ok(())
}

/// Sex category per player id, for the ids that exist in the directory.
pub fn sex_by_ids(conn: &Connection, ids: &[PlayerId]) -> Result<HashMap<PlayerId, String>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    let sql = format!("SELECT id, sex FROM players WHERE id IN ({})", placeholders);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<HashMap<_, _>>>()
        .context("Failed to look up player sex categories")?;
    Ok(rows)
}
