//! Volleyball court rotation web app: library with models, rotation logic
//! and SQLite persistence.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    adjust_score, end_match_manual, register_win, start_match, substitute, ConfigProvider,
    MatchArchive, PlayerDirectory, WinOutcome, DEFAULT_MAX_WINS, DEFAULT_TEAM_SIZE, MAX_WINS_KEY,
    TEAM_SIZE_KEY,
};
pub use models::{
    ArchivedMatch, CourtId, CourtRegistry, EndReason, LiveMatch, MatchId, MatchOutcome,
    MatchParticipation, MatchStatus, Player, PlayerId, PlayerPatch, Queue, RotationError, Session,
    StatusPatch, Team,
};
