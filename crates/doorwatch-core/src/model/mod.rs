// ── Domain model ──

pub mod door;
pub mod door_id;

pub use door::{Door, DoorEntry};
pub use door_id::{DoorId, DoorState};
