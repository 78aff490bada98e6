// ── Polling tasks ──

mod bootstrap;
mod updates;
mod uptime;

pub use bootstrap::bootstrap;
pub use updates::UpdatePoller;
pub use uptime::UptimeReporter;
