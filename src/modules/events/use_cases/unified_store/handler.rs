// Unified events store.
//
// Purpose
// - Single in-memory source of truth for remote, generated and manual events.
//
// Responsibilities
// - Commit every mutation to the state container first, then run persistence
//   and remote sync as independent best-effort steps.
// - Load months through the TTL cache and merge them over what is resident.
// - Hydrate from durable storage at most once concurrently.
//
// Boundaries
// - Best-effort failures are logged and never roll back committed state.
// - Read-path failures propagate after the loading flags are reset.

use crate::modules::events::adapters::outbound::events_api::EventsApi;
use crate::modules::events::adapters::outbound::month_cache::{EventCache, month_key};
use crate::modules::events::adapters::outbound::persistence::EventPersistence;
use crate::modules::events::adapters::outbound::snapshot::SnapshotStore;
use crate::modules::events::core::event::{EventPatch, EventSource, PublicEvent, SyncStatus, UnifiedEvent};
use crate::modules::events::core::filter::EventFilter;
use crate::modules::events::core::local_id::is_local_id;
use crate::modules::events::core::operations::{
    filter_events, merge_events, to_public_event, to_unified_event, toggle_bookmark,
};
use crate::modules::events::core::stats::{EventStats, calculate_stats};
use crate::modules::events::core::validation::validate;
use crate::modules::events::use_cases::unified_store::errors::EventsError;
use crate::modules::events::use_cases::unified_store::state::{EventsState, StoreSyncStatus};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

pub struct UnifiedEventsStore<TApi, TPersistence>
where
    TApi: EventsApi + ?Sized + 'static,
    TPersistence: EventPersistence + ?Sized + 'static,
{
    api: Arc<TApi>,
    persistence: Arc<TPersistence>,
    cache: Arc<EventCache>,
    snapshot: Option<Arc<dyn SnapshotStore>>,
    snapshot_writer: Mutex<()>,
    state: watch::Sender<Arc<EventsState>>,
}

impl<TApi, TPersistence> UnifiedEventsStore<TApi, TPersistence>
where
    TApi: EventsApi + ?Sized + 'static,
    TPersistence: EventPersistence + ?Sized + 'static,
{
    pub fn new(api: Arc<TApi>, persistence: Arc<TPersistence>, cache: Arc<EventCache>) -> Self {
        let (state, _) = watch::channel(Arc::new(EventsState::default()));
        Self {
            api,
            persistence,
            cache,
            snapshot: None,
            snapshot_writer: Mutex::new(()),
            state,
        }
    }

    /// Attach a snapshot store and hydrate the event slice from it.
    pub fn with_snapshot_store(mut self, snapshot: Arc<dyn SnapshotStore>) -> Self {
        match snapshot.load() {
            Ok(Some(saved)) => {
                tracing::info!(count = saved.all_event_ids.len(), "restoring events from snapshot");
                self.state.send_modify(|state| Arc::make_mut(state).restore(saved));
            }
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "could not read events snapshot, starting empty"),
        }
        self.snapshot = Some(snapshot);
        self
    }

    /// Current state. Cheap; the returned value never changes.
    pub fn state(&self) -> Arc<EventsState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<EventsState>> {
        self.state.subscribe()
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    async fn commit_events(&self, mutate: impl FnOnce(&mut EventsState)) {
        self.state.send_modify(|state| mutate(Arc::make_mut(state)));
        self.write_snapshot().await;
    }

    /// Commit that leaves the event slice untouched, so no snapshot is written.
    fn commit_flags(&self, mutate: impl FnOnce(&mut EventsState)) {
        self.state.send_modify(|state| mutate(Arc::make_mut(state)));
    }

    /// Writers take turns and each one reads the state only once it holds the
    /// turn, so the last write on disk always carries every earlier commit.
    async fn write_snapshot(&self) {
        let Some(store) = self.snapshot.clone() else {
            return;
        };
        let _turn = self.snapshot_writer.lock().await;
        let snapshot = self.state().snapshot();
        match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(%error, "writing events snapshot failed"),
            Err(error) => tracing::warn!(%error, "snapshot writer task failed"),
        }
    }

    async fn persist_best_effort(&self, event: &UnifiedEvent) {
        if let Err(error) = self.persistence.save_event(event).await {
            tracing::warn!(event_id = %event.id(), %error, "persisting event failed");
        }
    }

    async fn unpersist_best_effort(&self, id: &str) {
        if let Err(error) = self.persistence.remove_event(id).await {
            tracing::warn!(event_id = %id, %error, "removing persisted event failed");
        }
    }

    async fn remote_save_best_effort(&self, event: &UnifiedEvent) {
        if is_local_id(event.id()) {
            return;
        }
        if let Err(error) = self.api.save_event(&to_public_event(event)).await {
            tracing::warn!(event_id = %event.id(), %error, "remote save failed, keeping local state");
        }
    }

    pub async fn add_event(&self, event: PublicEvent) -> Result<UnifiedEvent, EventsError> {
        let source = if event.details.generated {
            EventSource::Generated
        } else {
            EventSource::Manual
        };
        // Manual events are accepted as typed.
        if source == EventSource::Generated {
            let errors = validate(&event);
            if !errors.is_empty() {
                return Err(EventsError::Validation(errors));
            }
        }

        let is_bookmarked = event.bookmarked();
        let unified = to_unified_event(event, source, is_bookmarked);
        let committed = unified.clone();
        self.commit_events(|state| state.upsert(committed)).await;
        tracing::info!(event_id = %unified.id(), ?source, "event added");

        if unified.metadata.is_persisted {
            self.persist_best_effort(&unified).await;
        }
        self.remote_save_best_effort(&unified).await;
        Ok(unified)
    }

    pub async fn update_event(&self, id: &str, changes: EventPatch) -> Result<UnifiedEvent, EventsError> {
        let mut updated = self
            .state()
            .get(id)
            .cloned()
            .ok_or_else(|| EventsError::NotFound(id.to_string()))?;
        changes.apply(&mut updated.details);
        updated.metadata.last_modified = Utc::now();
        updated.metadata.sync_status = SyncStatus::Pending;

        let errors = validate(&to_public_event(&updated));
        if !errors.is_empty() {
            return Err(EventsError::Validation(errors));
        }

        let committed = updated.clone();
        self.commit_events(|state| state.upsert(committed)).await;
        tracing::info!(event_id = %id, "event updated");

        if updated.metadata.is_persisted {
            self.persist_best_effort(&updated).await;
        }
        self.remote_save_best_effort(&updated).await;
        Ok(updated)
    }

    /// Unknown ids are ignored.
    pub async fn remove_event(&self, id: &str) {
        let Some(existing) = self.state().get(id).cloned() else {
            tracing::warn!(event_id = %id, "remove requested for unknown event");
            return;
        };
        self.commit_events(|state| {
            state.remove(id);
        })
        .await;
        tracing::info!(event_id = %id, "event removed");

        self.unpersist_best_effort(id).await;
        if !is_local_id(id) {
            let user_id = &existing.metadata.owning_user_id;
            if let Err(error) = self.api.delete_event(id, user_id).await {
                tracing::warn!(event_id = %id, %error, "remote delete failed, keeping local state");
            }
        }
    }

    pub async fn toggle_bookmark(&self, id: &str) -> Result<UnifiedEvent, EventsError> {
        let current = self
            .state()
            .get(id)
            .cloned()
            .ok_or_else(|| EventsError::NotFound(id.to_string()))?;
        let toggled = toggle_bookmark(&current);
        let committed = toggled.clone();
        self.commit_events(|state| state.upsert(committed)).await;
        tracing::info!(event_id = %id, is_bookmarked = toggled.metadata.is_bookmarked, "bookmark toggled");

        self.persist_best_effort(&toggled).await;

        if is_local_id(id) {
            return Ok(toggled);
        }
        match self.api.toggle_bookmark(id, &toggled.metadata.owning_user_id).await {
            Ok(()) => {
                self.commit_events(|state| {
                    if let Some(event) = state.all_events.get_mut(id) {
                        event.metadata.sync_status = SyncStatus::Synced;
                    }
                })
                .await;
            }
            Err(error) => {
                tracing::warn!(event_id = %id, %error, "remote bookmark sync failed, left pending");
            }
        }
        Ok(self.state().get(id).cloned().unwrap_or(toggled))
    }

    /// `month` is zero-based.
    pub async fn load_month_events(&self, user_id: &str, month: u32, year: i32) -> Result<(), EventsError> {
        let key = month_key(user_id, month, year);
        if let Some(entry) = self.cache.get(&key) {
            tracing::debug!(month_key = %key, count = entry.event_ids.len(), "month cache hit");
            self.commit_flags(|state| {
                state.loaded_months.insert(key);
            });
            return Ok(());
        }
        tracing::debug!(month_key = %key, "month cache miss");

        self.commit_flags(|state| {
            state.is_loading = true;
            state.sync_status = StoreSyncStatus::Loading;
            state.last_error = None;
        });

        match self.api.load_month_events(user_id, month, year).await {
            Ok(events) => {
                let loaded: Vec<UnifiedEvent> = events
                    .into_iter()
                    .map(|event| {
                        let is_bookmarked = event.bookmarked();
                        to_unified_event(event, EventSource::Remote, is_bookmarked)
                    })
                    .collect();
                let ids = loaded.iter().map(|event| event.id().to_string()).collect();
                let count = loaded.len();
                let loaded_key = key.clone();
                self.commit_events(|state| {
                    let merged = merge_events(&state.events(), &loaded);
                    state.replace_events(merged);
                    state.loaded_months.insert(loaded_key);
                    state.is_loading = false;
                    state.sync_status = StoreSyncStatus::Idle;
                })
                .await;
                self.cache.set(&key, ids);
                tracing::info!(month_key = %key, count, "month events loaded");
                Ok(())
            }
            Err(error) => {
                tracing::error!(month_key = %key, %error, "loading month events failed");
                let message = error.to_string();
                self.commit_flags(|state| {
                    state.is_loading = false;
                    state.sync_status = StoreSyncStatus::Error;
                    state.last_error = Some(message);
                });
                Err(error.into())
            }
        }
    }

    /// Merge durable events over memory. A call made while another is in
    /// flight returns immediately.
    pub async fn load_persisted_events(&self) {
        let acquired = self.state.send_if_modified(|state| {
            if state.is_loading_persisted {
                return false;
            }
            Arc::make_mut(state).is_loading_persisted = true;
            true
        });
        if !acquired {
            tracing::debug!("persisted events already loading");
            return;
        }

        match self.persistence.load_events().await {
            Ok(persisted) if persisted.is_empty() => {
                self.commit_flags(|state| state.is_loading_persisted = false);
            }
            Ok(persisted) => {
                let count = persisted.len();
                self.commit_events(|state| {
                    let merged = merge_events(&state.events(), &persisted);
                    state.replace_events(merged);
                    state.is_loading_persisted = false;
                })
                .await;
                tracing::info!(count, "persisted events loaded");
            }
            Err(error) => {
                tracing::warn!(%error, "loading persisted events failed");
                self.commit_flags(|state| state.is_loading_persisted = false);
            }
        }
    }

    pub fn all_events(&self) -> Vec<UnifiedEvent> {
        self.state().events()
    }

    pub fn bookmarked_events(&self) -> Vec<UnifiedEvent> {
        self.events_by_filter(&EventFilter::bookmarked())
    }

    pub fn generated_events(&self) -> Vec<UnifiedEvent> {
        self.events_by_filter(&EventFilter::source(EventSource::Generated))
    }

    pub fn manual_events(&self) -> Vec<UnifiedEvent> {
        self.events_by_filter(&EventFilter::source(EventSource::Manual))
    }

    pub fn event_by_id(&self, id: &str) -> Option<UnifiedEvent> {
        self.state().get(id).cloned()
    }

    pub fn event_stats(&self) -> EventStats {
        calculate_stats(&self.all_events())
    }

    pub fn events_by_filter(&self, filter: &EventFilter) -> Vec<UnifiedEvent> {
        filter_events(&self.all_events(), filter)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        self.commit_flags(|state| state.loaded_months.clear());
    }

    pub fn invalidate_month(&self, user_id: &str, month: u32, year: i32) {
        let key = month_key(user_id, month, year);
        self.cache.invalidate(&key);
        self.commit_flags(|state| {
            state.loaded_months.remove(&key);
        });
    }
}
