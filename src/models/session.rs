//! Session aggregate: waiting queue, court registry, and RotationError.

use crate::models::game::LiveMatch;
use crate::models::player::PlayerId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a court slot (1..=N, N fixed at startup).
pub type CourtId = u32;

/// Errors that can occur during rotation operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RotationError {
    /// Court id outside the configured set.
    InvalidCourt(CourtId),
    /// A match is already being played on that court.
    CourtOccupied(CourtId),
    /// Queue has fewer players than the operation needs.
    InsufficientQueue { required: usize, available: usize },
    /// No match is being played on that court.
    NoActiveMatch(CourtId),
    /// Team label is not "A" or "B".
    InvalidTeam(String),
    /// The entering player is not in the waiting queue.
    PlayerNotQueued(PlayerId),
    /// The leaving player is on neither roster of the active match.
    PlayerNotOnCourt(PlayerId),
    /// Writing the finished match to the archive failed; no state was changed.
    ArchiveWrite(String),
}

impl std::fmt::Display for RotationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationError::InvalidCourt(id) => write!(f, "Court {} does not exist", id),
            RotationError::CourtOccupied(id) => write!(f, "Court {} already has a match", id),
            RotationError::InsufficientQueue { required, available } => {
                write!(f, "Need {} players in the queue (have {})", required, available)
            }
            RotationError::NoActiveMatch(id) => write!(f, "No match being played on court {}", id),
            RotationError::InvalidTeam(label) => write!(f, "Unknown team '{}'", label),
            RotationError::PlayerNotQueued(id) => write!(f, "Player {} is not in the queue", id),
            RotationError::PlayerNotOnCourt(id) => write!(f, "Player {} is not on this court", id),
            RotationError::ArchiveWrite(msg) => write!(f, "Failed to archive the match: {}", msg),
        }
    }
}

impl std::error::Error for RotationError {}

/// Ordered waiting list of player ids. Head of the queue plays next.
/// Never persisted: the queue belongs to the running session only.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Queue {
    ids: Vec<PlayerId>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.ids.iter().any(|id| id == player_id)
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    /// Append to the tail unless already queued. Returns whether the player
    /// was added (a duplicate join is a no-op, not an error).
    pub fn enqueue(&mut self, player_id: PlayerId) -> bool {
        if self.contains(&player_id) {
            return false;
        }
        self.ids.push(player_id);
        true
    }

    /// Remove the player if queued. Returns whether anything was removed.
    pub fn dequeue(&mut self, player_id: &str) -> bool {
        match self.ids.iter().position(|id| id == player_id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Move an already-queued player to the tail. No-op if absent.
    pub fn requeue_to_tail(&mut self, player_id: &str) -> bool {
        if self.dequeue(player_id) {
            self.ids.push(player_id.to_string());
            true
        } else {
            false
        }
    }

    /// Remove and return the first `n` entries in queue order. All-or-nothing:
    /// fails without touching the queue when fewer than `n` are waiting.
    pub fn take_front(&mut self, n: usize) -> Result<Vec<PlayerId>, RotationError> {
        if self.ids.len() < n {
            return Err(RotationError::InsufficientQueue {
                required: n,
                available: self.ids.len(),
            });
        }
        Ok(self.ids.drain(0..n).collect())
    }

    /// Uniformly permute the whole queue in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.ids.shuffle(rng);
    }

    /// Append a shuffled copy of `player_ids` to the tail. Used when a whole
    /// roster returns to the queue, so the same group does not re-form.
    pub fn extend_shuffled<R: Rng>(&mut self, mut player_ids: Vec<PlayerId>, rng: &mut R) {
        player_ids.shuffle(rng);
        self.ids.extend(player_ids);
    }
}

/// Fixed set of court slots, each holding at most one live match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourtRegistry {
    courts: BTreeMap<CourtId, Option<LiveMatch>>,
}

impl CourtRegistry {
    /// Registry with courts numbered 1..=count, all empty.
    pub fn new(count: u32) -> Self {
        Self {
            courts: (1..=count).map(|id| (id, None)).collect(),
        }
    }

    pub fn is_valid_id(&self, court_id: CourtId) -> bool {
        self.courts.contains_key(&court_id)
    }

    pub fn get(&self, court_id: CourtId) -> Result<&Option<LiveMatch>, RotationError> {
        self.courts
            .get(&court_id)
            .ok_or(RotationError::InvalidCourt(court_id))
    }

    /// Active match on the court, or `NoActiveMatch` if the slot is empty.
    pub fn active(&self, court_id: CourtId) -> Result<&LiveMatch, RotationError> {
        self.get(court_id)?
            .as_ref()
            .ok_or(RotationError::NoActiveMatch(court_id))
    }

    pub fn active_mut(&mut self, court_id: CourtId) -> Result<&mut LiveMatch, RotationError> {
        self.courts
            .get_mut(&court_id)
            .ok_or(RotationError::InvalidCourt(court_id))?
            .as_mut()
            .ok_or(RotationError::NoActiveMatch(court_id))
    }

    pub fn set(
        &mut self,
        court_id: CourtId,
        value: Option<LiveMatch>,
    ) -> Result<(), RotationError> {
        match self.courts.get_mut(&court_id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RotationError::InvalidCourt(court_id)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CourtId, &Option<LiveMatch>)> {
        self.courts.iter()
    }
}

/// The in-memory state every rotation operation reads and mutates. Owned by
/// the web layer behind a single lock; one mutating operation at a time.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub queue: Queue,
    pub courts: CourtRegistry,
}

impl Session {
    /// Fresh session: empty queue, `court_count` empty courts.
    pub fn new(court_count: u32) -> Self {
        Self {
            queue: Queue::new(),
            courts: CourtRegistry::new(court_count),
        }
    }
}
