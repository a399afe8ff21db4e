//! Player directory records and partial-update types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (uuid-v4 text; used in the queue, rosters and the archive).
pub type PlayerId = String;

/// A registered player. `sex` is a one-letter category; `"F"` is the only
/// value team formation treats specially.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub whatsapp: Option<String>,
    pub sex: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub is_present: bool,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with a fresh id. Active by default, not yet present.
    pub fn new(
        name: impl Into<String>,
        whatsapp: Option<String>,
        sex: impl Into<String>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            whatsapp,
            sex: sex.into(),
            avatar,
            is_active: true,
            is_present: false,
            created_at: Utc::now(),
        }
    }
}

/// Partial update of a player's profile fields. Only the fields present in
/// the request are applied.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    pub sex: Option<String>,
    pub avatar: Option<String>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.whatsapp.is_none() && self.sex.is_none() && self.avatar.is_none()
    }

    /// Apply the provided fields to a player, leaving the rest untouched.
    pub fn apply(&self, player: &mut Player) {
        if let Some(name) = &self.name {
            player.name = name.clone();
        }
        if let Some(whatsapp) = &self.whatsapp {
            player.whatsapp = Some(whatsapp.clone());
        }
        if let Some(sex) = &self.sex {
            player.sex = sex.clone();
        }
        if let Some(avatar) = &self.avatar {
            player.avatar = Some(avatar.clone());
        }
    }
}

/// Partial update of a player's activation/presence flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub is_active: Option<bool>,
    pub is_present: Option<bool>,
}

impl StatusPatch {
    /// Apply the provided flags to a player.
    pub fn apply(&self, player: &mut Player) {
        if let Some(active) = self.is_active {
            player.is_active = active;
        }
        if let Some(present) = self.is_present {
            player.is_present = present;
        }
    }
}
