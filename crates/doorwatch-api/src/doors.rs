// Controller endpoints
//
// `cfg`, `upd`, `upt` feed the monitor; `clk`, `st`, `cla` and `api` are
// the door control surface.

use serde_json::Value;
use tracing::debug;

use crate::auth::DoorCommand;
use crate::client::DoorClient;
use crate::error::Error;
use crate::models::{DoorRecord, UpdateBatch, uptime_text};

impl DoorClient {
    /// Fetch every configured door with its current state (`cfg`).
    pub async fn doors(&self) -> Result<Vec<DoorRecord>, Error> {
        let url = self.endpoint_url("cfg")?;
        let timeout = self.request_timeout();
        self.get_json(self.request(url, &[], None, false), timeout)
            .await
    }

    /// Fetch the changes recorded since `since` (`upd`).
    ///
    /// The controller may hold this request open until something changes,
    /// so it carries its own deadline (30s by default).
    pub async fn updates(&self, since: i64) -> Result<UpdateBatch, Error> {
        let url = self.endpoint_url("upd")?;
        let since = since.to_string();
        let timeout = self.timeouts().updates;
        let builder = self.request(url, &[("lastupdate", since.as_str())], Some(timeout), false);
        self.get_json(builder, timeout).await
    }

    /// Fetch the controller's uptime text (`upt`).
    pub async fn uptime(&self) -> Result<String, Error> {
        let url = self.endpoint_url("upt")?;
        let timeout = self.timeouts().uptime;
        let value: Value = self
            .get_json(self.request(url, &[], Some(timeout), false), timeout)
            .await?;
        Ok(uptime_text(&value))
    }

    /// Pulse the relay of one door (`clk`).
    pub async fn click(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint_url("clk")?;
        debug!(door = id, "click");
        let timeout = self.request_timeout();
        self.get_text(self.request(url, &[("id", id)], None, true), timeout)
            .await?;
        Ok(())
    }

    /// The controller's last known state label for one door (`st`).
    ///
    /// Unknown ids yield an empty string.
    pub async fn status(&self, id: &str) -> Result<String, Error> {
        let url = self.endpoint_url("st")?;
        let timeout = self.request_timeout();
        let body = self
            .get_text(self.request(url, &[("id", id)], None, false), timeout)
            .await?;
        Ok(body.trim().to_owned())
    }

    /// Ask the controller to close every open door (`cla`).
    pub async fn close_all(&self) -> Result<(), Error> {
        let url = self.endpoint_url("cla")?;
        let timeout = self.request_timeout();
        self.get_text(self.request(url, &[], None, true), timeout)
            .await?;
        Ok(())
    }

    /// Run a key-protected command against one door (`api`).
    pub async fn command(&self, api_key: &str, command: DoorCommand, id: &str) -> Result<(), Error> {
        let url = self.endpoint_url("api")?;
        let timeout = self.request_timeout();
        let query = [("key", api_key), ("command", command.as_str()), ("id", id)];
        match self
            .get_text(self.request(url, &query, None, false), timeout)
            .await
        {
            Ok(_) => Ok(()),
            Err(Error::Api {
                status: 403,
                message,
            }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }
}
