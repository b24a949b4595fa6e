// Persistence for environments with no durable storage.
// Writes are accepted and dropped, reads are empty.

use crate::modules::events::adapters::outbound::persistence::{EventPersistence, PersistenceError};
use crate::modules::events::core::event::UnifiedEvent;

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEventPersistence;

#[async_trait::async_trait]
impl EventPersistence for DisabledEventPersistence {
    async fn save_events(&self, events: &[UnifiedEvent]) -> Result<(), PersistenceError> {
        tracing::trace!(count = events.len(), "durable storage unavailable, dropping events");
        Ok(())
    }

    async fn load_events(&self) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        Ok(Vec::new())
    }

    async fn save_event(&self, event: &UnifiedEvent) -> Result<(), PersistenceError> {
        tracing::trace!(event_id = %event.id(), "durable storage unavailable, dropping event");
        Ok(())
    }

    async fn remove_event(&self, _id: &str) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn events_by_user_id(&self, _user_id: &str) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        Ok(Vec::new())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
