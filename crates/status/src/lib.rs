//! Status records extracted from the game log.
//!
//! Two records accumulate while the log is read: who the player is and what
//! mission they are in. When a mission completes, snapshots of both are
//! published to the end screen document as JSON bindings.

use serde::{Deserialize, Serialize};

/// Player identity, set by "Player name changed" log lines.
///
/// Overwritten whenever the event reoccurs; never expires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub clan: String,
}

/// Mission identity, replaced whenever a new mission is announced.
///
/// Only valid between one "Mission name" line and the next; `difficulty`
/// stays empty until a later line provides it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub difficulty: String,
}

impl MissionStatus {
    /// Fresh record for a newly announced mission, superseding any previous
    /// one.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty: String::new(),
        }
    }
}

/// Log-derived state, owned by the control loop and mutated in place by the
/// classifier.
///
/// `mission` stays `None` until the first mission announcement, so a
/// difficulty line arriving earlier is detectable as out of context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub player: PlayerStatus,
    pub mission: Option<MissionStatus>,
}

/// Emitted by the classifier when the log reports a finished mission.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Mission succeeded; carries snapshots of both records for display.
    MissionComplete {
        player: PlayerStatus,
        mission: MissionStatus,
    },
}
