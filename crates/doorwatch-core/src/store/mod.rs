// ── View-model storage ──

mod board;

pub use board::{BoardSnapshot, DoorBoard};
