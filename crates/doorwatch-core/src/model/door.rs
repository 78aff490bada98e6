// ── Door domain types ──

use serde::{Deserialize, Serialize};

use doorwatch_api::{ChangeRecord, DoorRecord};

use super::door_id::{DoorId, DoorState};
use crate::format::format_state;

/// A door as reported by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    /// Display name; set at bootstrap and never updated by polls.
    pub name: String,
    pub state: DoorState,
    /// Seconds since the epoch of the last state change.
    pub changed_at: Option<i64>,
}

impl From<DoorRecord> for Door {
    fn from(rec: DoorRecord) -> Self {
        Self {
            id: rec.id.into(),
            name: rec.name,
            state: rec.state.into(),
            changed_at: rec.changed_at,
        }
    }
}

/// One row of the rendered door list: the door plus its display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorEntry {
    #[serde(flatten)]
    pub door: Door,
    /// e.g. `"Closed as of Jan 2nd, 2024, 3:04 PM"`.
    pub status_text: String,
    /// e.g. `"img/closed.png"`.
    pub icon: String,
}

impl DoorEntry {
    pub fn new(door: Door) -> Self {
        let status_text = format_state(door.state.as_str(), door.changed_at);
        let icon = door.state.icon_path();
        Self {
            door,
            status_text,
            icon,
        }
    }

    pub fn id(&self) -> &DoorId {
        &self.door.id
    }

    /// Replace state and time from a change record, recomputing the
    /// display fields. The name is left untouched.
    pub fn apply(&mut self, change: &ChangeRecord) {
        self.door.state = DoorState::new(change.state.clone());
        self.door.changed_at = change.changed_at;
        self.status_text = format_state(&change.state, change.changed_at);
        self.icon = self.door.state.icon_path();
    }
}
