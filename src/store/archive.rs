//! Match archive: append-only store of finished matches.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::models::{
    ArchivedMatch, EndReason, MatchId, MatchOutcome, MatchParticipation, Team,
};

/// Write a finished match and all its participation rows in one transaction.
pub fn insert_finished_match(
    conn: &mut Connection,
    record: &ArchivedMatch,
    participations: &[MatchParticipation],
) -> Result<MatchId> {
    let tx = conn.transaction().context("Failed to open transaction")?;
    tx.execute(
        "INSERT INTO matches (id, court_id, started_at, ended_at, score_a, score_b, winner, end_reason) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.court_id,
            record.started_at,
            record.ended_at,
            record.score_a,
            record.score_b,
            record.winner.map(Team::as_str),
            record.end_reason.as_str(),
        ],
    )
    .context("Failed to insert match")?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO match_participations (id, match_id, player_id, team, outcome) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for p in participations {
            stmt.execute(params![
                p.id,
                p.match_id,
                p.player_id,
                p.team.as_str(),
                p.outcome.as_str(),
            ])
            .context("Failed to insert match participation")?;
        }
    }
    tx.commit().context("Failed to commit match archive")?;
    Ok(record.id.clone())
}

/// An archived match with its participation rows, for the history endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct MatchRecord {
    #[serde(flatten)]
    pub summary: ArchivedMatch,
    pub participations: Vec<MatchParticipation>,
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<ArchivedMatch> {
    let winner: Option<String> = row.get(6)?;
    let reason: String = row.get(7)?;
    Ok(ArchivedMatch {
        id: row.get(0)?,
        court_id: row.get(1)?,
        started_at: row.get(2)?,
        ended_at: row.get(3)?,
        score_a: row.get(4)?,
        score_b: row.get(5)?,
        winner: match winner {
            Some(label) => Some(team_from_sql(&label, 6)?),
            None => None,
        },
        end_reason: EndReason::parse(&reason).ok_or_else(|| bad_column(7, &reason))?,
    })
}

fn parse_participation_row(row: &rusqlite::Row) -> rusqlite::Result<MatchParticipation> {
    let team: String = row.get(3)?;
    let outcome: String = row.get(4)?;
    Ok(MatchParticipation {
        id: row.get(0)?,
        match_id: row.get(1)?,
        player_id: row.get(2)?,
        team: team_from_sql(&team, 3)?,
        outcome: MatchOutcome::parse(&outcome).ok_or_else(|| bad_column(4, &outcome))?,
    })
}

fn team_from_sql(label: &str, column: usize) -> rusqlite::Result<Team> {
    Team::parse(label).map_err(|_| bad_column(column, label))
}

fn bad_column(column: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        format!("unexpected value '{}'", value).into(),
    )
}

/// All archived matches, newest first, each with its participation rows.
pub fn list_matches(conn: &Connection) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, court_id, started_at, ended_at, score_a, score_b, winner, end_reason FROM matches ORDER BY ended_at DESC",
    )?;
    let summaries = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list archived matches")?;

    let mut part_stmt = conn.prepare(
        "SELECT id, match_id, player_id, team, outcome FROM match_participations WHERE match_id = ?1",
    )?;
    let mut records = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let participations = part_stmt
            .query_map(params![summary.id], parse_participation_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list match participations")?;
        records.push(MatchRecord {
            summary,
            participations,
        });
    }
    Ok(records)
}
