// Serialize-on-mutation hook for the store's event slice.
//
// Boundaries
// - Only `allEvents` and `allEventIds` are written. Cache state, loaded months
//   and loading flags never leave the process.

pub mod in_memory;
pub mod json_file;

use crate::modules::events::core::event::UnifiedEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub all_events: HashMap<String, UnifiedEvent>,
    pub all_event_ids: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait SnapshotStore: Send + Sync {
    /// Previously saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<StateSnapshot>, SnapshotError>;
    fn save(&self, snapshot: &StateSnapshot) -> Result<(), SnapshotError>;
}
