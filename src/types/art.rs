//! Framework record types every event file carries.

use serde::{Deserialize, Serialize};

/// Status of one trigger path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStatus {
    pub name: String,
    pub accepted: bool,
}

/// Per-event trigger decisions (`art::TriggerResults`).
///
/// The type name ends in `s` but is a single record, which is why quicktag
/// parsing never treats it as a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResults {
    #[serde(default)]
    pub paths: Vec<PathStatus>,
}

impl TriggerResults {
    /// True if any path accepted the event.
    pub fn accept(&self) -> bool {
        self.paths.iter().any(|p| p.accepted)
    }

    /// Acceptance of a named path, if the path ran.
    pub fn path(&self, name: &str) -> Option<bool> {
        self.paths.iter().find(|p| p.name == name).map(|p| p.accepted)
    }
}
