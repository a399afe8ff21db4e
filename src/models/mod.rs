//! Data structures for court rotation: players, matches, queue and courts.

mod game;
mod player;
mod session;

pub use game::{
    ArchivedMatch, EndReason, LiveMatch, MatchId, MatchOutcome, MatchParticipation, MatchStatus,
    Team,
};
pub use player::{Player, PlayerId, PlayerPatch, StatusPatch};
pub use session::{CourtId, CourtRegistry, Queue, RotationError, Session};
