//! Event catalog entries used for short-id reconciliation

use serde::{Deserialize, Serialize};

/// An event known to the surrounding application.
///
/// The ledger only carries 8-character short event ids; the catalog is
/// what allows the scanner to hand full identifiers back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownEvent {
    pub id: String,
    pub title: String,
}

impl KnownEvent {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
        }
    }

    /// Whether a (possibly short) ledger event id refers to this event.
    pub fn matches(&self, ledger_event_id: &str) -> bool {
        self.id == ledger_event_id
            || (!ledger_event_id.is_empty() && self.id.starts_with(ledger_event_id))
    }
}
