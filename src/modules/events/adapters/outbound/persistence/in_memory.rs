// In memory implementation of the EventPersistence port.
//
// Purpose
// - Exercise the store without a database, including the offline path.

use crate::modules::events::adapters::outbound::persistence::{EventPersistence, PersistenceError};
use crate::modules::events::core::event::UnifiedEvent;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryEventPersistence {
    rows: RwLock<BTreeMap<String, UnifiedEvent>>,
    is_offline: AtomicBool,
    writes: AtomicUsize,
    loads: AtomicUsize,
    delay_load_ms: AtomicU64,
}

impl InMemoryEventPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Number of successful write operations (saves and removals).
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `load_events` calls, successful or not.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn set_delay_load_ms(&self, ms: u64) {
        self.delay_load_ms.store(ms, Ordering::SeqCst);
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.rows.read().await.contains_key(id)
    }

    fn ensure_online(&self) -> Result<(), PersistenceError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(PersistenceError::Backend("Event persistence offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EventPersistence for InMemoryEventPersistence {
    async fn save_events(&self, events: &[UnifiedEvent]) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        let mut rows = self.rows.write().await;
        for event in events {
            rows.insert(event.id().to_string(), event.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_events(&self) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_load_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.ensure_online()?;
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn save_event(&self, event: &UnifiedEvent) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        self.rows
            .write()
            .await
            .insert(event.id().to_string(), event.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_event(&self, id: &str) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        self.rows.write().await.remove(id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn events_by_user_id(&self, user_id: &str) -> Result<Vec<UnifiedEvent>, PersistenceError> {
        self.ensure_online()?;
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|event| event.metadata.owning_user_id == user_id)
            .cloned()
            .collect())
    }

    async fn clear(&self) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        self.rows.write().await.clear();
        Ok(())
    }
}
