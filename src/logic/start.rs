//! Team formation: pull the next group from the queue and start a match.

use crate::logic::{ConfigProvider, PlayerDirectory};
use crate::models::{CourtId, LiveMatch, PlayerId, RotationError, Session};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Start a match on an empty court with the first 2T queued players.
///
/// 1. Court must exist and be empty; queue must hold at least 2T players.
/// 2. The selected group is shuffled before the sex split so that queue
///    position does not correlate with team assignment (players who arrive
///    together should not automatically play together).
/// 3. Female players ("F") are dealt alternately to team A and team B, then
///    the remaining players fill team A up to T and the rest go to team B.
pub fn start_match<R: Rng>(
    session: &mut Session,
    config: &impl ConfigProvider,
    directory: &impl PlayerDirectory,
    rng: &mut R,
    court_id: CourtId,
) -> Result<LiveMatch, RotationError> {
    if !session.courts.is_valid_id(court_id) {
        return Err(RotationError::InvalidCourt(court_id));
    }
    if session.courts.get(court_id)?.is_some() {
        return Err(RotationError::CourtOccupied(court_id));
    }

    let team_size = config.team_size();
    let mut picked = session.queue.take_front(team_size * 2)?;
    picked.shuffle(rng);

    let sexes = directory.sex_by_ids(&picked);
    let (team_a, team_b) = form_teams(picked, &sexes, team_size);

    let game = LiveMatch::new(team_a, team_b);
    session.courts.set(court_id, Some(game.clone()))?;
    Ok(game)
}

/// Split 2T players into two teams of T, spreading female players across
/// both sides. Ids without a known sex category count as "not female".
fn form_teams(
    picked: Vec<PlayerId>,
    sexes: &HashMap<PlayerId, String>,
    team_size: usize,
) -> (Vec<PlayerId>, Vec<PlayerId>) {
    let (female, other): (Vec<PlayerId>, Vec<PlayerId>) = picked
        .into_iter()
        .partition(|id| sexes.get(id).map(|s| s == "F").unwrap_or(false));

    let mut team_a = Vec::with_capacity(team_size);
    let mut team_b = Vec::with_capacity(team_size);
    for (i, id) in female.into_iter().enumerate() {
        if i % 2 == 0 {
            team_a.push(id);
        } else {
            team_b.push(id);
        }
    }
    for id in other {
        if team_a.len() < team_size {
            team_a.push(id);
        } else {
            team_b.push(id);
        }
    }
    (team_a, team_b)
}
