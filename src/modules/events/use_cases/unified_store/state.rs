// State container contents for the unified events store.
//
// Every commit replaces the whole value (copy-on-write), so a reader holding an
// `Arc<EventsState>` keeps a consistent view while later commits land.

use crate::modules::events::adapters::outbound::snapshot::StateSnapshot;
use crate::modules::events::core::event::UnifiedEvent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Progress of the last read-path load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreSyncStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsState {
    pub all_events: HashMap<String, UnifiedEvent>,
    /// Insertion order of `all_events`. Always the same id set as the map.
    pub all_event_ids: Vec<String>,
    pub is_loading: bool,
    pub sync_status: StoreSyncStatus,
    /// Message of the last failed read, cleared when the next read starts.
    pub last_error: Option<String>,
    /// Month keys merged into memory this session.
    pub loaded_months: BTreeSet<String>,
    pub is_loading_persisted: bool,
}

impl EventsState {
    /// Events in id order.
    pub fn events(&self) -> Vec<UnifiedEvent> {
        self.all_event_ids
            .iter()
            .filter_map(|id| self.all_events.get(id))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&UnifiedEvent> {
        self.all_events.get(id)
    }

    pub fn len(&self) -> usize {
        self.all_event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_event_ids.is_empty()
    }

    /// Insert or replace. A new id is appended to the order.
    pub fn upsert(&mut self, event: UnifiedEvent) {
        let id = event.id().to_string();
        if self.all_events.insert(id.clone(), event).is_none() {
            self.all_event_ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<UnifiedEvent> {
        let removed = self.all_events.remove(id)?;
        self.all_event_ids.retain(|existing| existing != id);
        Some(removed)
    }

    /// Replace the whole event slice with `events`, keeping their order.
    pub fn replace_events(&mut self, events: Vec<UnifiedEvent>) {
        self.all_events.clear();
        self.all_event_ids.clear();
        for event in events {
            self.upsert(event);
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            all_events: self.all_events.clone(),
            all_event_ids: self.all_event_ids.clone(),
        }
    }

    /// Load the event slice from a snapshot. Ids without a body are dropped.
    pub fn restore(&mut self, snapshot: StateSnapshot) {
        let StateSnapshot {
            mut all_events,
            all_event_ids,
        } = snapshot;
        let events = all_event_ids
            .iter()
            .filter_map(|id| all_events.remove(id))
            .collect();
        self.replace_events(events);
    }
}
