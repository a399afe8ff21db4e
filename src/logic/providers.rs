//! Capabilities the rotation engine consumes from the outside world.

use crate::models::{ArchivedMatch, MatchId, MatchParticipation, PlayerId, RotationError};
use std::collections::HashMap;

/// Setting key for the number of players per side.
pub const TEAM_SIZE_KEY: &str = "TamanhoTime";
/// Players per side when the setting is missing.
pub const DEFAULT_TEAM_SIZE: i64 = 4;
/// Setting key for the consecutive-win limit.
pub const MAX_WINS_KEY: &str = "MaxVitorias";
/// Consecutive wins before a team rotates out, when the setting is missing.
pub const DEFAULT_MAX_WINS: i64 = 3;

/// Named integer settings with defaults.
pub trait ConfigProvider {
    fn int_setting(&self, key: &str, default: i64) -> i64;

    /// Configured team size, clamped to at least 1.
    fn team_size(&self) -> usize {
        self.int_setting(TEAM_SIZE_KEY, DEFAULT_TEAM_SIZE).max(1) as usize
    }

    /// Configured consecutive-win limit, clamped to at least 1.
    fn max_wins(&self) -> u32 {
        self.int_setting(MAX_WINS_KEY, DEFAULT_MAX_WINS).max(1) as u32
    }
}

/// Read access to player records. Only the sex category matters to the engine.
pub trait PlayerDirectory {
    /// Sex category per player id. Ids missing from the result count as
    /// "not female" during team formation.
    fn sex_by_ids(&self, ids: &[PlayerId]) -> HashMap<PlayerId, String>;
}

/// Durable append-only store of finished matches.
pub trait MatchArchive {
    /// Persist a finished match and its participation rows as one atomic
    /// write. On error the caller must leave all in-memory state untouched.
    fn commit_match(
        &self,
        record: &ArchivedMatch,
        participations: &[MatchParticipation],
    ) -> Result<MatchId, RotationError>;
}
