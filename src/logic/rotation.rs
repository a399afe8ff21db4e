//! Match end and rotation policy: who leaves the court, who comes in.

use crate::logic::{ConfigProvider, MatchArchive};
use crate::models::{
    ArchivedMatch, CourtId, EndReason, MatchOutcome, RotationError, Session, Team,
};
use chrono::Utc;
use rand::Rng;

/// What happened to the court after a win was registered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WinOutcome {
    /// Winners stay; the losing roster was replaced by fresh challengers.
    ChallengersIn,
    /// Winners reached the consecutive-win limit; the court was cleared and
    /// both rosters went back to the queue.
    WinLimitReached,
    /// Not enough challengers waiting to refill the losing side; the court
    /// was cleared so it does not sit occupied but unplayable.
    QueueExhausted,
}

impl WinOutcome {
    /// Human-readable summary for API responses.
    pub fn message(self) -> &'static str {
        match self {
            WinOutcome::ChallengersIn => "Winners stay on court; new challengers enter",
            WinOutcome::WinLimitReached => "Winners reached the win limit and rotate out",
            WinOutcome::QueueExhausted => "Queue too short for new challengers; court cleared",
        }
    }
}

/// Register the winner of the match on `court_id` and rotate the court.
///
/// The finished match is archived first; only after the archive commit
/// succeeds is any in-memory state touched, so an archive failure leaves the
/// queue and the court exactly as they were.
///
/// Rotation policy: the losing roster always returns to the queue tail,
/// shuffled. The winners stay for the next group of challengers unless they
/// just reached the consecutive-win limit, in which case they rotate out too.
/// If the queue cannot supply a full challenger roster, the court is cleared
/// as well; with the limit active this only happens when configuration grows
/// the team size mid-session.
///
/// `final_score` overrides the recorded score in the archive, for correcting
/// a miscounted rally at game point.
pub fn register_win<R: Rng>(
    session: &mut Session,
    config: &impl ConfigProvider,
    archive: &impl MatchArchive,
    rng: &mut R,
    court_id: CourtId,
    winner: &str,
    final_score: Option<(u32, u32)>,
) -> Result<WinOutcome, RotationError> {
    let game = session.courts.active(court_id)?.clone();
    let winner = Team::parse(winner)?;
    let loser = winner.other();

    let score = final_score.unwrap_or((game.score_a, game.score_b));
    let record = ArchivedMatch::from_live(&game, court_id, score, Some(winner), EndReason::Score);
    let (outcome_a, outcome_b) = match winner {
        Team::A => (MatchOutcome::Win, MatchOutcome::Loss),
        Team::B => (MatchOutcome::Loss, MatchOutcome::Win),
    };
    archive.commit_match(&record, &record.participations(&game, outcome_a, outcome_b))?;

    // Archive committed; everything below is in-memory only and cannot fail.
    let streak = game.streak(winner) + 1;
    if streak >= config.max_wins() {
        session.queue.extend_shuffled(game.roster(loser).to_vec(), rng);
        session.queue.extend_shuffled(game.roster(winner).to_vec(), rng);
        session.courts.set(court_id, None)?;
        return Ok(WinOutcome::WinLimitReached);
    }

    // Challenger availability is judged before the losers rejoin the tail;
    // a roster that just left may not turn around and walk straight back on.
    match session.queue.take_front(config.team_size()) {
        Ok(challengers) => {
            session.queue.extend_shuffled(game.roster(loser).to_vec(), rng);
            let mut next = game;
            *next.roster_mut(loser) = challengers;
            next.set_streak(winner, streak);
            next.set_streak(loser, 0);
            next.score_a = 0;
            next.score_b = 0;
            next.started_at = Utc::now();
            session.courts.set(court_id, Some(next))?;
            Ok(WinOutcome::ChallengersIn)
        }
        Err(_) => {
            session.queue.extend_shuffled(game.roster(loser).to_vec(), rng);
            session.queue.extend_shuffled(game.roster(winner).to_vec(), rng);
            session.courts.set(court_id, None)?;
            Ok(WinOutcome::QueueExhausted)
        }
    }
}

/// End the match on `court_id` without a winner.
///
/// Archives the match as cancelled with the score as it stood and a draw for
/// every participant, then returns both rosters (shuffled together) to the
/// queue tail and clears the court. As with [`register_win`], the archive
/// write happens before any in-memory mutation.
pub fn end_match_manual<R: Rng>(
    session: &mut Session,
    archive: &impl MatchArchive,
    rng: &mut R,
    court_id: CourtId,
) -> Result<(), RotationError> {
    let game = session.courts.active(court_id)?.clone();

    let record = ArchivedMatch::from_live(
        &game,
        court_id,
        (game.score_a, game.score_b),
        None,
        EndReason::Cancelled,
    );
    let participations = record.participations(&game, MatchOutcome::Draw, MatchOutcome::Draw);
    archive.commit_match(&record, &participations)?;

    session.queue.extend_shuffled(game.all_players(), rng);
    session.courts.set(court_id, None)?;
    Ok(())
}
