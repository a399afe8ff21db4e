//! Integration tests for scoring, win registration and the rotation policy.

mod common;

use common::{ids, rng, session_with_queue, FailingArchive, FakeConfig, MemoryArchive};
use volley_rotation_web::{
    adjust_score, end_match_manual, register_win, EndReason, LiveMatch, MatchOutcome,
    RotationError, Session, Team, WinOutcome,
};

fn sorted(ids: &[String]) -> Vec<String> {
    let mut v = ids.to_vec();
    v.sort();
    v
}

/// Court 1 busy with a0..a3 vs b0..b3, given win streaks, plus `waiting`
/// players in the queue.
fn session_with_match(streak_a: u32, streak_b: u32, waiting: &[String]) -> Session {
    let mut session = session_with_queue(2, waiting);
    let mut game = LiveMatch::new(ids("a", 4), ids("b", 4));
    game.streak_a = streak_a;
    game.streak_b = streak_b;
    session.courts.set(1, Some(game)).unwrap();
    session
}

#[test]
fn adjust_score_requires_an_active_match() {
    let mut session = session_with_queue(2, &[]);
    let err = adjust_score(&mut session, 1, "A", 1).unwrap_err();
    assert_eq!(err, RotationError::NoActiveMatch(1));
}

#[test]
fn adjust_score_rejects_unknown_teams() {
    let mut session = session_with_match(0, 0, &[]);
    let err = adjust_score(&mut session, 1, "C", 1).unwrap_err();
    assert_eq!(err, RotationError::InvalidTeam("C".to_string()));
}

#[test]
fn adjust_score_adds_and_clamps_at_zero() {
    let mut session = session_with_match(0, 0, &[]);
    adjust_score(&mut session, 1, "A", 3).unwrap();
    assert_eq!(session.courts.active(1).unwrap().score_a, 3);

    // A wildly negative correction clamps to zero instead of underflowing.
    adjust_score(&mut session, 1, "A", -999).unwrap();
    assert_eq!(session.courts.active(1).unwrap().score_a, 0);

    // The other team is untouched throughout.
    assert_eq!(session.courts.active(1).unwrap().score_b, 0);
}

#[test]
fn register_win_requires_an_active_match() {
    let mut session = session_with_queue(2, &[]);
    let err = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap_err();
    assert_eq!(err, RotationError::NoActiveMatch(1));
}

#[test]
fn register_win_rejects_unknown_teams() {
    let mut session = session_with_match(0, 0, &[]);
    let err = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "X",
        None,
    )
    .unwrap_err();
    assert_eq!(err, RotationError::InvalidTeam("X".to_string()));
}

#[test]
fn win_archives_the_match_with_per_player_outcomes() {
    let mut session = session_with_match(0, 0, &ids("q", 4));
    let archive = MemoryArchive::new();
    adjust_score(&mut session, 1, "A", 21).unwrap();
    adjust_score(&mut session, 1, "B", 15).unwrap();
    register_win(
        &mut session,
        &FakeConfig::defaults(),
        &archive,
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap();

    let committed = archive.committed.borrow();
    let (record, participations) = &committed[0];
    assert_eq!(record.court_id, 1);
    assert_eq!((record.score_a, record.score_b), (21, 15));
    assert_eq!(record.winner, Some(Team::A));
    assert_eq!(record.end_reason, EndReason::Score);

    assert_eq!(participations.len(), 8);
    for p in participations {
        let expected = match p.team {
            Team::A => MatchOutcome::Win,
            Team::B => MatchOutcome::Loss,
        };
        assert_eq!(p.outcome, expected);
        assert_eq!(p.match_id, record.id);
    }
}

#[test]
fn explicit_final_score_overrides_the_recorded_one() {
    let mut session = session_with_match(0, 0, &ids("q", 4));
    let archive = MemoryArchive::new();
    adjust_score(&mut session, 1, "A", 20).unwrap();
    register_win(
        &mut session,
        &FakeConfig::defaults(),
        &archive,
        &mut rng(),
        1,
        "A",
        Some((25, 23)),
    )
    .unwrap();

    let committed = archive.committed.borrow();
    assert_eq!(
        (committed[0].0.score_a, committed[0].0.score_b),
        (25, 23)
    );
}

#[test]
fn winners_stay_and_challengers_replace_the_losers() {
    let challengers = ids("q", 4);
    let mut session = session_with_match(0, 0, &challengers);
    adjust_score(&mut session, 1, "A", 21).unwrap();
    let outcome = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap();
    assert_eq!(outcome, WinOutcome::ChallengersIn);

    let game = session.courts.active(1).unwrap();
    // Team A is unchanged and keeps its streak; team B is the challengers.
    assert_eq!(game.team_a, ids("a", 4));
    assert_eq!(game.team_b, challengers);
    assert_eq!(game.streak_a, 1);
    assert_eq!(game.streak_b, 0);
    // Fresh game: score reset.
    assert_eq!((game.score_a, game.score_b), (0, 0));

    // The four losers are back in the queue (in some shuffled order).
    assert_eq!(sorted(session.queue.ids()), sorted(&ids("b", 4)));
}

#[test]
fn win_limit_clears_the_court_and_requeues_everyone() {
    // Streak 2 with max 3: this win is the third in a row.
    let mut session = session_with_match(2, 0, &[]);
    let outcome = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap();
    assert_eq!(outcome, WinOutcome::WinLimitReached);

    assert_eq!(session.courts.get(1).unwrap(), &None);
    // All 8 participants are queued exactly once.
    let mut expected = ids("a", 4);
    expected.extend(ids("b", 4));
    assert_eq!(sorted(session.queue.ids()), sorted(&expected));
}

#[test]
fn short_queue_clears_the_court_instead_of_blocking() {
    // Only 2 waiting with team size 4: winners cannot get challengers.
    let mut session = session_with_match(0, 0, &ids("q", 2));
    let outcome = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap();
    assert_eq!(outcome, WinOutcome::QueueExhausted);

    assert_eq!(session.courts.get(1).unwrap(), &None);
    // The two waiting players keep their spot at the front of the queue.
    assert_eq!(&session.queue.ids()[..2], &ids("q", 2)[..]);
    assert_eq!(session.queue.len(), 10);
}

#[test]
fn waiting_losers_do_not_count_as_fresh_challengers() {
    // 3 waiting with team size 4: even though the 4 losers would push the
    // queue past 4, the court still rotates out.
    let mut session = session_with_match(0, 0, &ids("q", 3));
    let outcome = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &MemoryArchive::new(),
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap();
    assert_eq!(outcome, WinOutcome::QueueExhausted);
    assert_eq!(session.courts.get(1).unwrap(), &None);
}

#[test]
fn failed_archive_write_leaves_state_untouched() {
    let mut session = session_with_match(1, 0, &ids("q", 4));
    let before = session.clone();
    let err = register_win(
        &mut session,
        &FakeConfig::defaults(),
        &FailingArchive,
        &mut rng(),
        1,
        "A",
        None,
    )
    .unwrap_err();
    assert!(matches!(err, RotationError::ArchiveWrite(_)));
    assert_eq!(session, before);
}

#[test]
fn manual_end_archives_a_cancelled_draw_and_requeues_everyone() {
    let mut session = session_with_match(2, 1, &ids("q", 1));
    let archive = MemoryArchive::new();
    adjust_score(&mut session, 1, "B", 7).unwrap();
    end_match_manual(&mut session, &archive, &mut rng(), 1).unwrap();

    let committed = archive.committed.borrow();
    let (record, participations) = &committed[0];
    assert_eq!(record.winner, None);
    assert_eq!(record.end_reason, EndReason::Cancelled);
    assert_eq!((record.score_a, record.score_b), (0, 7));
    assert!(participations
        .iter()
        .all(|p| p.outcome == MatchOutcome::Draw));

    assert_eq!(session.courts.get(1).unwrap(), &None);
    let mut expected = ids("q", 1);
    expected.extend(ids("a", 4));
    expected.extend(ids("b", 4));
    assert_eq!(sorted(session.queue.ids()), sorted(&expected));
    // The player who was already waiting keeps the front spot.
    assert_eq!(session.queue.ids()[0], "q0");
}

#[test]
fn failed_archive_write_aborts_a_manual_end() {
    let mut session = session_with_match(0, 0, &[]);
    let before = session.clone();
    let err = end_match_manual(&mut session, &FailingArchive, &mut rng(), 1).unwrap_err();
    assert!(matches!(err, RotationError::ArchiveWrite(_)));
    assert_eq!(session, before);
}

#[test]
fn consecutive_wins_accumulate_across_rotations() {
    // Win twice with enough challengers each time: streak builds to 2.
    let mut waiting = ids("q", 4);
    waiting.extend(ids("r", 4));
    let mut session = session_with_match(0, 0, &waiting);
    let config = FakeConfig::defaults();
    let archive = MemoryArchive::new();

    register_win(&mut session, &config, &archive, &mut rng(), 1, "A", None).unwrap();
    register_win(&mut session, &config, &archive, &mut rng(), 1, "A", None).unwrap();

    let game = session.courts.active(1).unwrap();
    assert_eq!(game.streak_a, 2);
    assert_eq!(game.team_a, ids("a", 4));
    // Second wave of challengers is on court now.
    assert_eq!(game.team_b, ids("r", 4));
    assert_eq!(archive.len(), 2);
}
