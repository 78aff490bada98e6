// ── Bootstrap loader ──
//
// One-shot fetch of the door list. Entries are appended in response order.

use tracing::{debug, info};

use crate::backend::DoorBackend;
use crate::error::CoreError;
use crate::model::Door;
use crate::store::DoorBoard;
use crate::view::ListView;

/// Fetch the door list and append one entry per door.
///
/// Returns the number of entries added. Never touches the update cursor.
/// On error the board is left as it was.
pub async fn bootstrap<B: DoorBackend>(
    backend: &B,
    board: &DoorBoard,
    view: &dyn ListView,
) -> Result<usize, CoreError> {
    let records = backend.doors().await?;
    debug!(count = records.len(), "door list received");

    let mut added = 0;
    for record in records {
        if let Some(entry) = board.append(Door::from(record)) {
            view.append(&entry);
            added += 1;
        }
    }
    view.refresh();

    info!(doors = added, "door list loaded");
    Ok(added)
}
