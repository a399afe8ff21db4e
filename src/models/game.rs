//! Match data: live matches on a court, archived matches, participations.

use crate::models::player::PlayerId;
use crate::models::session::{CourtId, RotationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an archived match.
pub type MatchId = String;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// Parse a team label from request data. Anything other than "A"/"B" is rejected.
    pub fn parse(label: &str) -> Result<Self, RotationError> {
        match label {
            "A" => Ok(Team::A),
            "B" => Ok(Team::B),
            other => Err(RotationError::InvalidTeam(other.to_string())),
        }
    }

    pub fn other(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Team::A => "A",
            Team::B => "B",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a match currently on a court. An empty slot means no match, so
/// `Playing` is the only live state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Playing,
}

/// A match in progress on one court: rosters, running score, and each side's
/// consecutive-win counter. Not persisted; the archive only sees finished matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub status: MatchStatus,
    pub started_at: DateTime<Utc>,
    pub score_a: u32,
    pub score_b: u32,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub streak_a: u32,
    pub streak_b: u32,
}

impl LiveMatch {
    /// Create a freshly started match with zero scores and zero streaks.
    pub fn new(team_a: Vec<PlayerId>, team_b: Vec<PlayerId>) -> Self {
        Self {
            status: MatchStatus::Playing,
            started_at: Utc::now(),
            score_a: 0,
            score_b: 0,
            team_a,
            team_b,
            streak_a: 0,
            streak_b: 0,
        }
    }

    pub fn roster(&self, team: Team) -> &[PlayerId] {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    pub fn roster_mut(&mut self, team: Team) -> &mut Vec<PlayerId> {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
        }
    }

    pub fn score(&self, team: Team) -> u32 {
        match team {
            Team::A => self.score_a,
            Team::B => self.score_b,
        }
    }

    pub fn set_score(&mut self, team: Team, value: u32) {
        match team {
            Team::A => self.score_a = value,
            Team::B => self.score_b = value,
        }
    }

    pub fn streak(&self, team: Team) -> u32 {
        match team {
            Team::A => self.streak_a,
            Team::B => self.streak_b,
        }
    }

    pub fn set_streak(&mut self, team: Team, value: u32) {
        match team {
            Team::A => self.streak_a = value,
            Team::B => self.streak_b = value,
        }
    }

    /// Which roster (if any) a player is currently on.
    pub fn team_of(&self, player_id: &str) -> Option<Team> {
        if self.team_a.iter().any(|id| id == player_id) {
            Some(Team::A)
        } else if self.team_b.iter().any(|id| id == player_id) {
            Some(Team::B)
        } else {
            None
        }
    }

    /// Both rosters, team A first. Order inside each roster is preserved.
    pub fn all_players(&self) -> Vec<PlayerId> {
        self.team_a.iter().chain(self.team_b.iter()).cloned().collect()
    }
}

/// Why an archived match ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Ended by registering a winner.
    Score,
    /// Ended manually without a winner.
    Cancelled,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Score => "score",
            EndReason::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "score" => Some(EndReason::Score),
            "cancelled" => Some(EndReason::Cancelled),
            _ => None,
        }
    }
}

/// A single player's result in an archived match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl MatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Win => "win",
            MatchOutcome::Loss => "loss",
            MatchOutcome::Draw => "draw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "win" => Some(MatchOutcome::Win),
            "loss" => Some(MatchOutcome::Loss),
            "draw" => Some(MatchOutcome::Draw),
            _ => None,
        }
    }
}

/// Immutable record of a finished match, written once at end time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchivedMatch {
    pub id: MatchId,
    pub court_id: CourtId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Option<Team>,
    pub end_reason: EndReason,
}

impl ArchivedMatch {
    /// Snapshot a live match into an archive record with a fresh id.
    pub fn from_live(
        live: &LiveMatch,
        court_id: CourtId,
        final_score: (u32, u32),
        winner: Option<Team>,
        end_reason: EndReason,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            court_id,
            started_at: live.started_at,
            ended_at: Utc::now(),
            score_a: final_score.0,
            score_b: final_score.1,
            winner,
            end_reason,
        }
    }

    /// Participation rows for every player on both rosters, with per-team outcomes.
    pub fn participations(
        &self,
        live: &LiveMatch,
        outcome_a: MatchOutcome,
        outcome_b: MatchOutcome,
    ) -> Vec<MatchParticipation> {
        let rows_for = |ids: &[PlayerId], team: Team, outcome: MatchOutcome| {
            ids.iter()
                .map(|id| MatchParticipation {
                    id: Uuid::new_v4().to_string(),
                    match_id: self.id.clone(),
                    player_id: id.clone(),
                    team,
                    outcome,
                })
                .collect::<Vec<_>>()
        };
        let mut rows = rows_for(&live.team_a, Team::A, outcome_a);
        rows.extend(rows_for(&live.team_b, Team::B, outcome_b));
        rows
    }
}

/// One player's row in an archived match. The player reference is weak: the
/// archive keeps rows for players that are later deactivated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipation {
    pub id: String,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub team: Team,
    pub outcome: MatchOutcome,
}
