// ── Controller backend seam ──
//
// The polling tasks talk to the controller through `DoorBackend` so that
// tests can drive them with scripted responses and a paused clock.

use std::future::Future;

use doorwatch_api::{DoorClient, DoorRecord, UpdateBatch};

use crate::error::CoreError;

/// The four endpoints the monitor needs.
pub trait DoorBackend: Send + Sync + 'static {
    /// Full door list (`cfg`).
    fn doors(&self) -> impl Future<Output = Result<Vec<DoorRecord>, CoreError>> + Send;

    /// Changes since `cursor` (`upd`). May block until something changes.
    fn updates(&self, cursor: i64) -> impl Future<Output = Result<UpdateBatch, CoreError>> + Send;

    /// Display text of the controller's uptime (`upt`).
    fn uptime(&self) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Press the button for door `id` (`clk`).
    fn click(&self, id: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl DoorBackend for DoorClient {
    async fn doors(&self) -> Result<Vec<DoorRecord>, CoreError> {
        Ok(DoorClient::doors(self).await?)
    }

    async fn updates(&self, cursor: i64) -> Result<UpdateBatch, CoreError> {
        Ok(DoorClient::updates(self, cursor).await?)
    }

    async fn uptime(&self) -> Result<String, CoreError> {
        Ok(DoorClient::uptime(self).await?)
    }

    async fn click(&self, id: &str) -> Result<(), CoreError> {
        Ok(DoorClient::click(self, id).await?)
    }
}

