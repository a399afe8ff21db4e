//! Shared fakes and builders for engine tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::HashMap;
use volley_rotation_web::{
    ArchivedMatch, ConfigProvider, MatchArchive, MatchId, MatchParticipation, PlayerDirectory,
    PlayerId, RotationError, Session, MAX_WINS_KEY, TEAM_SIZE_KEY,
};

/// Fixed settings; keys not present fall back to the engine defaults.
pub struct FakeConfig(pub HashMap<String, i64>);

impl FakeConfig {
    pub fn with(team_size: i64, max_wins: i64) -> Self {
        let mut settings = HashMap::new();
        settings.insert(TEAM_SIZE_KEY.to_string(), team_size);
        settings.insert(MAX_WINS_KEY.to_string(), max_wins);
        Self(settings)
    }

    pub fn defaults() -> Self {
        Self(HashMap::new())
    }
}

impl ConfigProvider for FakeConfig {
    fn int_setting(&self, key: &str, default: i64) -> i64 {
        self.0.get(key).copied().unwrap_or(default)
    }
}

/// Sex category per player id; ids not listed count as "not female".
pub struct FakeDirectory(pub HashMap<PlayerId, String>);

impl FakeDirectory {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn female(ids: &[PlayerId]) -> Self {
        Self(ids.iter().map(|id| (id.clone(), "F".to_string())).collect())
    }
}

impl PlayerDirectory for FakeDirectory {
    fn sex_by_ids(&self, ids: &[PlayerId]) -> HashMap<PlayerId, String> {
        ids.iter()
            .filter_map(|id| self.0.get(id).map(|sex| (id.clone(), sex.clone())))
            .collect()
    }
}

/// Archive that records every commit in memory.
#[derive(Default)]
pub struct MemoryArchive {
    pub committed: RefCell<Vec<(ArchivedMatch, Vec<MatchParticipation>)>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.committed.borrow().len()
    }
}

impl MatchArchive for MemoryArchive {
    fn commit_match(
        &self,
        record: &ArchivedMatch,
        participations: &[MatchParticipation],
    ) -> Result<MatchId, RotationError> {
        self.committed
            .borrow_mut()
            .push((record.clone(), participations.to_vec()));
        Ok(record.id.clone())
    }
}

/// Archive whose writes always fail, for rollback tests.
pub struct FailingArchive;

impl MatchArchive for FailingArchive {
    fn commit_match(
        &self,
        _record: &ArchivedMatch,
        _participations: &[MatchParticipation],
    ) -> Result<MatchId, RotationError> {
        Err(RotationError::ArchiveWrite("disk full".to_string()))
    }
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn ids(prefix: &str, n: usize) -> Vec<PlayerId> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

pub fn session_with_queue(court_count: u32, queued: &[PlayerId]) -> Session {
    let mut session = Session::new(court_count);
    for id in queued {
        session.queue.enqueue(id.clone());
    }
    session
}
