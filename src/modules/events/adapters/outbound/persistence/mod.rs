// Durable local storage of events.
//
// Purpose
// - Keep events that must survive a restart (remote or bookmarked) available
//   without the network.
//
// Boundaries
// - Callers treat every failure here as non-fatal; the in-memory store stays
//   authoritative for the running session.
// - Environments without durable storage use the disabled adapter, which
//   resolves to empty results instead of failing.

pub mod disabled;
pub mod in_memory;
pub mod sqlite;

use crate::modules::events::core::event::UnifiedEvent;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage engine error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored event could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Task(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EventPersistence: Send + Sync {
    /// Upsert every event, keyed by id.
    async fn save_events(&self, events: &[UnifiedEvent]) -> Result<(), PersistenceError>;
    async fn load_events(&self) -> Result<Vec<UnifiedEvent>, PersistenceError>;
    async fn save_event(&self, event: &UnifiedEvent) -> Result<(), PersistenceError>;
    async fn remove_event(&self, id: &str) -> Result<(), PersistenceError>;
    async fn events_by_user_id(&self, user_id: &str) -> Result<Vec<UnifiedEvent>, PersistenceError>;
    async fn clear(&self) -> Result<(), PersistenceError>;
}
