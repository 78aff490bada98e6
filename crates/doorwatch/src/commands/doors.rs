//! Door command handlers.

use secrecy::ExposeSecret;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use doorwatch_api::{DoorClient, DoorCommand};
use doorwatch_core::{Door, DoorEntry};

use crate::cli::{DoorsArgs, DoorsCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DoorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&DoorEntry> for DoorRow {
    fn from(e: &DoorEntry) -> Self {
        Self {
            id: e.id().to_string(),
            name: e.door.name.clone(),
            status: e.status_text.clone(),
        }
    }
}

#[derive(Serialize)]
struct DoorStatus<'a> {
    id: &'a str,
    state: &'a str,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    resolved: &Resolved,
    args: DoorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::client(resolved)?;

    match args.command {
        DoorsCommand::List => {
            let entries: Vec<DoorEntry> = client
                .doors()
                .await?
                .into_iter()
                .map(|rec| DoorEntry::new(Door::from(rec)))
                .collect();
            let out = output::render_list(global.output, &entries, |e| DoorRow::from(e), |e| {
                format!("{}\t{}", e.id(), e.door.state)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DoorsCommand::Status { id } => {
            let state = client.status(&id).await?;
            // The controller answers an empty body for unknown ids.
            if state.is_empty() {
                return Err(CliError::DoorNotFound { identifier: id });
            }
            let status = DoorStatus {
                id: &id,
                state: &state,
            };
            let out = output::render_single(global.output, &status, |s| s.state.to_owned())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DoorsCommand::Toggle { id } => {
            client.click(&id).await?;
            done(global, &format!("Toggled {id}"));
            Ok(())
        }

        DoorsCommand::Open { id } => {
            send_command(&client, resolved, global, DoorCommand::Open, &id).await
        }
        DoorsCommand::Close { id } => {
            send_command(&client, resolved, global, DoorCommand::Close, &id).await
        }

        DoorsCommand::CloseAll => {
            if !util::confirm("Close all open doors?", "close-all", global.yes)? {
                return Ok(());
            }
            client.close_all().await?;
            done(global, "Close requested for all open doors");
            Ok(())
        }
    }
}

async fn send_command(
    client: &DoorClient,
    resolved: &Resolved,
    global: &GlobalOpts,
    command: DoorCommand,
    id: &str,
) -> Result<(), CliError> {
    let key = resolved
        .monitor
        .api_key
        .as_ref()
        .ok_or_else(|| CliError::NoApiKey {
            profile: resolved.profile_name.clone(),
        })?;

    client
        .command(key.expose_secret(), command, id)
        .await
        .map_err(|e| match e {
            doorwatch_api::Error::Authentication { message } => CliError::AuthFailed {
                profile: resolved.profile_name.clone(),
                message,
            },
            other => other.into(),
        })?;
    debug!(%command, id, "door command accepted");

    done(global, &format!("{command} sent to {id}"));
    Ok(())
}

fn done(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use doorwatch_core::{DoorId, DoorState, format_state};

    use super::*;

    #[test]
    fn row_uses_status_text() {
        let entry = DoorEntry::new(Door {
            id: DoorId::new("left"),
            name: "Left".into(),
            state: DoorState::new("open"),
            changed_at: Some(1_704_207_840),
        });
        let row = DoorRow::from(&entry);
        assert_eq!(row.id, "left");
        assert_eq!(row.name, "Left");
        assert_eq!(row.status, format_state("open", Some(1_704_207_840)));
    }
}
