// ── Rendering collaborator ──
//
// The monitor keeps the view model in a `DoorBoard`; a `ListView`
// is told about each change so it can redraw. Implementations must be
// cheap: calls happen on the polling tasks.

use crate::model::DoorEntry;

/// Receives view-model changes from the polling tasks.
pub trait ListView: Send + Sync + 'static {
    /// A door was added at the end of the list.
    fn append(&self, entry: &DoorEntry);

    /// An existing door changed state.
    fn update(&self, entry: &DoorEntry);

    /// Called once after a batch of updates has been applied.
    fn refresh(&self) {}

    /// New uptime text from the controller.
    fn set_uptime(&self, text: &str);
}

/// A view that renders nothing. Useful for headless monitoring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ListView for NullView {
    fn append(&self, _entry: &DoorEntry) {}
    fn update(&self, _entry: &DoorEntry) {}
    fn set_uptime(&self, _text: &str) {}
}
