//! Substitution: swap one player on court for one player in the queue.

use crate::models::{CourtId, RotationError, Session};

/// Replace `leaving_id` on its roster with `entering_id` from the queue.
///
/// A direct one-for-one swap, not a rotation event: nothing is shuffled, the
/// roster keeps its size, the leaving player goes to the queue tail.
pub fn substitute(
    session: &mut Session,
    court_id: CourtId,
    leaving_id: &str,
    entering_id: &str,
) -> Result<(), RotationError> {
    let game = session.courts.active(court_id)?;
    if !session.queue.contains(entering_id) {
        return Err(RotationError::PlayerNotQueued(entering_id.to_string()));
    }
    let team = game
        .team_of(leaving_id)
        .ok_or_else(|| RotationError::PlayerNotOnCourt(leaving_id.to_string()))?;

    let roster = session.courts.active_mut(court_id)?.roster_mut(team);
    roster.retain(|id| id != leaving_id);
    roster.push(entering_id.to_string());

    session.queue.dequeue(entering_id);
    session.queue.enqueue(leaving_id.to_string());
    Ok(())
}
