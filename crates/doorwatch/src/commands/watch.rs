//! Live door view: runs a `Monitor` until Ctrl-C.

use std::io::{self, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::json;

use doorwatch_core::{DoorEntry, ListView, Monitor};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

// ── Terminal view ───────────────────────────────────────────────────

/// Prints one line per view-model change, as text or JSON lines.
struct TerminalView {
    json: bool,
    color: bool,
}

impl TerminalView {
    fn new(global: &GlobalOpts) -> Self {
        Self {
            json: matches!(global.output, OutputFormat::Json | OutputFormat::JsonCompact),
            color: output::should_color(global.color),
        }
    }

    fn emit(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    }

    fn door_line(&self, entry: &DoorEntry) -> String {
        let name = format!("{:<16}", entry.door.name);
        if !self.color {
            return format!("{name} {}", entry.status_text);
        }
        let state = &entry.door.state;
        let status = if state.is_open() {
            entry.status_text.red().to_string()
        } else if state.is_closed() {
            entry.status_text.green().to_string()
        } else if state.is_transitional() {
            entry.status_text.yellow().to_string()
        } else {
            entry.status_text.clone()
        };
        format!("{} {status}", name.bold())
    }

    fn json_line(event: &str, entry: &DoorEntry) -> String {
        json!({ "event": event, "door": entry }).to_string()
    }
}

impl ListView for TerminalView {
    fn append(&self, entry: &DoorEntry) {
        if self.json {
            self.emit(&Self::json_line("append", entry));
        } else {
            self.emit(&self.door_line(entry));
        }
    }

    fn update(&self, entry: &DoorEntry) {
        if self.json {
            self.emit(&Self::json_line("update", entry));
        } else if self.color {
            self.emit(&format!("{} {}", "»".cyan(), self.door_line(entry)));
        } else {
            self.emit(&format!("» {}", self.door_line(entry)));
        }
    }

    fn refresh(&self) {
        let _ = io::stdout().lock().flush();
    }

    fn set_uptime(&self, text: &str) {
        if self.json {
            self.emit(&json!({ "event": "uptime", "text": text }).to_string());
        } else if self.color {
            self.emit(&text.dimmed().to_string());
        } else {
            self.emit(text);
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let view = Arc::new(TerminalView::new(global));
    let monitor = Monitor::connect(&resolved.monitor, view)?;

    monitor.start().await?;
    if !global.quiet {
        eprintln!("Watching {} (Ctrl-C to stop)", resolved.monitor.url);
    }

    tokio::signal::ctrl_c().await?;
    monitor.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use doorwatch_core::{Door, DoorId, DoorState};

    use super::*;

    fn entry(state: &str) -> DoorEntry {
        DoorEntry::new(Door {
            id: DoorId::new("left"),
            name: "Left".into(),
            state: DoorState::new(state),
            changed_at: None,
        })
    }

    #[test]
    fn plain_line() {
        let view = TerminalView {
            json: false,
            color: false,
        };
        let line = view.door_line(&entry("open"));
        assert!(line.starts_with("Left "));
        assert!(line.ends_with("Open as of Invalid Date"));
    }

    #[test]
    fn json_line_carries_door() {
        let line = TerminalView::json_line("update", &entry("closed"));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap_or_default();
        assert_eq!(value["event"], "update");
        assert_eq!(value["door"]["id"], "left");
        assert_eq!(value["door"]["state"], "closed");
    }
}
