//! Rotation engine: team formation, scoring, win rotation, substitution.

mod providers;
mod rotation;
mod score;
mod start;
mod substitution;

pub use providers::{
    ConfigProvider, MatchArchive, PlayerDirectory, DEFAULT_MAX_WINS, DEFAULT_TEAM_SIZE,
    MAX_WINS_KEY, TEAM_SIZE_KEY,
};
pub use rotation::{end_match_manual, register_win, WinOutcome};
pub use score::adjust_score;
pub use start::start_match;
pub use substitution::substitute;
