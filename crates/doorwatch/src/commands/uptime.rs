//! Uptime command handler.

use crate::cli::GlobalOpts;
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let text = util::client(resolved)?.uptime().await?;
    let out = output::render_single(global.output, text.as_str(), |s: &str| s.to_owned())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
