// ── Door board ──
//
// Ordered view model of the door list. Insertion order is bootstrap
// order; entries are never removed. Every mutation rebuilds the
// snapshot that `watch` subscribers receive.

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use indexmap::map::Entry;
use tokio::sync::watch;
use tracing::{debug, warn};

use doorwatch_api::ChangeRecord;

use crate::model::{Door, DoorEntry, DoorId};

/// Snapshot of the board, in display order.
pub type BoardSnapshot = Arc<Vec<DoorEntry>>;

/// Keyed, ordered door list plus the latest uptime text.
pub struct DoorBoard {
    entries: RwLock<IndexMap<DoorId, DoorEntry>>,
    uptime: watch::Sender<Option<String>>,
    snapshot: watch::Sender<BoardSnapshot>,
}

impl DoorBoard {
    pub fn new() -> Self {
        let (uptime, _) = watch::channel(None);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            entries: RwLock::new(IndexMap::new()),
            uptime,
            snapshot,
        }
    }

    /// Add a door at the end of the list.
    ///
    /// Returns the new entry, or `None` when the id is already present
    /// (the first occurrence wins).
    pub fn append(&self, door: Door) -> Option<DoorEntry> {
        let entry = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            match entries.entry(door.id.clone()) {
                Entry::Occupied(_) => {
                    warn!(id = %door.id, "duplicate door id in bootstrap list, keeping first");
                    return None;
                }
                Entry::Vacant(slot) => slot.insert(DoorEntry::new(door)).clone(),
            }
        };
        self.rebuild_snapshot();
        Some(entry)
    }

    /// Apply a change record to its entry.
    ///
    /// Returns the updated entry, or `None` for an unknown id.
    pub fn apply(&self, change: &ChangeRecord) -> Option<DoorEntry> {
        let updated = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let Some(entry) = entries.get_mut(change.id.as_str()) else {
                debug!(id = %change.id, "change for unknown door ignored");
                return None;
            };
            entry.apply(change);
            entry.clone()
        };
        self.rebuild_snapshot();
        Some(updated)
    }

    pub fn get(&self, id: &str) -> Option<DoorEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// All entries in display order.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to board changes.
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the uptime text.
    pub fn set_uptime(&self, text: String) {
        self.uptime.send_replace(Some(text));
    }

    /// Latest uptime text, if any poll has succeeded.
    pub fn uptime(&self) -> Option<String> {
        self.uptime.borrow().clone()
    }

    fn rebuild_snapshot(&self) {
        let snap: Vec<DoorEntry> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        self.snapshot.send_replace(Arc::new(snap));
    }
}

impl Default for DoorBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DoorState;

    fn door(id: &str, name: &str, state: &str, ts: i64) -> Door {
        Door {
            id: DoorId::new(id),
            name: name.into(),
            state: DoorState::new(state),
            changed_at: Some(ts),
        }
    }

    fn change(id: &str, state: &str, ts: i64) -> ChangeRecord {
        ChangeRecord {
            id: id.into(),
            state: state.into(),
            changed_at: Some(ts),
        }
    }

    #[test]
    fn append_keeps_order() {
        let board = DoorBoard::new();
        board.append(door("right", "Right", "closed", 1));
        board.append(door("left", "Left", "open", 2));

        let ids: Vec<_> = board.snapshot().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["right", "left"]);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let board = DoorBoard::new();
        assert!(board.append(door("left", "Left", "open", 1)).is_some());
        assert!(board.append(door("left", "Other", "closed", 2)).is_none());

        assert_eq!(board.len(), 1);
        assert_eq!(board.get("left").map(|e| e.door.name), Some("Left".into()));
    }

    #[test]
    fn apply_updates_known_door() {
        let board = DoorBoard::new();
        board.append(door("left", "Left", "open", 1));

        let updated = board.apply(&change("left", "closed", 100)).unwrap();
        assert_eq!(updated.door.state.as_str(), "closed");
        assert_eq!(updated.door.name, "Left");
        assert_eq!(board.get("left"), Some(updated));
    }

    #[test]
    fn apply_unknown_is_noop() {
        let board = DoorBoard::new();
        board.append(door("left", "Left", "open", 1));
        let before = board.snapshot();

        assert!(board.apply(&change("garage3", "open", 100)).is_none());
        assert_eq!(*board.snapshot(), *before);
    }

    #[test]
    fn uptime_replaced() {
        let board = DoorBoard::new();
        assert_eq!(board.uptime(), None);
        board.set_uptime("3 days".into());
        board.set_uptime("4 days".into());
        assert_eq!(board.uptime().as_deref(), Some("4 days"));
    }

    #[test]
    fn subscribers_see_changes() {
        let board = DoorBoard::new();
        let mut rx = board.subscribe();
        board.append(door("left", "Left", "open", 1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
