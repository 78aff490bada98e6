// ── Door identity types ──
//
// DoorId keys every entry on the board; DoorState carries the open-ended
// state label the controller reports ("open", "closed", "opening", ...).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── DoorId ──────────────────────────────────────────────────────────

/// Identifier of a door, as configured on the controller.
///
/// Stable across polls and unique within one controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorId(String);

impl DoorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DoorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DoorId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Borrow<str> for DoorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── DoorState ───────────────────────────────────────────────────────

/// A door's state label.
///
/// Not an enum: the controller may report labels this crate has never
/// seen, and the label doubles as the icon file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorState(String);

impl DoorState {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the icon for this state: `img/<label>.png`.
    ///
    /// The label is used verbatim (case-sensitive, no escaping).
    pub fn icon_path(&self) -> String {
        format!("img/{}.png", self.0)
    }

    pub fn is_open(&self) -> bool {
        self.0 == "open"
    }

    pub fn is_closed(&self) -> bool {
        self.0 == "closed"
    }

    /// `opening` / `closing`: the relay fired and the door is still moving.
    pub fn is_transitional(&self) -> bool {
        matches!(self.0.as_str(), "opening" | "closing")
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DoorState {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DoorState {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn icon_path_uses_label_verbatim() {
        assert_eq!(DoorState::from("open").icon_path(), "img/open.png");
        assert_eq!(DoorState::from("Closed").icon_path(), "img/Closed.png");
        assert_eq!(DoorState::from("half open").icon_path(), "img/half open.png");
    }

    #[test]
    fn state_predicates() {
        assert!(DoorState::from("open").is_open());
        assert!(DoorState::from("closed").is_closed());
        assert!(DoorState::from("closing").is_transitional());
        assert!(!DoorState::from("Open").is_open());
    }

    #[test]
    fn door_id_serializes_as_plain_string() {
        let id = DoorId::from("left");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"left\"");
    }
}
