//! Polling and view-model layer between `doorwatch-api` and UI consumers.
//!
//! - **[`Monitor`]**: Session facade. [`start()`](Monitor::start) loads the
//!   door list, then spawns the update poller and uptime reporter;
//!   [`shutdown()`](Monitor::shutdown) cancels and joins them. The session
//!   owns the update cursor and exposes it read-only through a `watch`
//!   receiver.
//!
//! - **[`DoorBoard`]**: Ordered view model of the door list plus the latest
//!   uptime text, with `watch`-based snapshots for reactive consumers.
//!
//! - **[`ListView`]**: Rendering collaborator told about every append,
//!   update and uptime change.
//!
//! - **[`DoorBackend`]**: The controller endpoints the polling tasks need,
//!   implemented for [`doorwatch_api::DoorClient`].

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod monitor;
pub mod store;
pub mod tasks;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::DoorBackend;
pub use config::{BasicAuth, MonitorConfig, Schedule, TlsVerification};
pub use error::CoreError;
pub use format::{format_state, format_state_in};
pub use model::{Door, DoorEntry, DoorId, DoorState};
pub use monitor::{Monitor, MonitorState, build_client};
pub use store::{BoardSnapshot, DoorBoard};
pub use view::{ListView, NullView};
