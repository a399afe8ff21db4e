//! Score adjustments on a running match.

use crate::models::{CourtId, RotationError, Session, Team};

/// Add `delta` to one team's score. The score is clamped at zero, so a large
/// negative delta empties it rather than going negative. No archive write.
pub fn adjust_score(
    session: &mut Session,
    court_id: CourtId,
    team: &str,
    delta: i32,
) -> Result<(), RotationError> {
    let game = session.courts.active_mut(court_id)?;
    let team = Team::parse(team)?;

    let current = game.score(team);
    let updated = if delta >= 0 {
        current.saturating_add(delta as u32)
    } else {
        current.saturating_sub(delta.unsigned_abs())
    };
    game.set_score(team, updated);
    Ok(())
}
