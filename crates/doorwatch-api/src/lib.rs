// doorwatch-api: Async Rust client for the garage door controller endpoints

pub mod auth;
pub mod client;
mod doors;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, DoorCommand};
pub use client::{DoorClient, EndpointTimeouts, UPDATE_TIMEOUT, UPTIME_TIMEOUT};
pub use error::Error;
pub use models::{ChangeRecord, DoorRecord, UpdateBatch};
pub use transport::{TlsMode, TransportConfig};
