use crate::modules::events::adapters::outbound::events_api::http::HttpEventsApi;
use crate::modules::events::adapters::outbound::events_api::{EventsApi, RemoteError};
use crate::modules::events::adapters::outbound::month_cache::EventCache;
use crate::modules::events::adapters::outbound::persistence::EventPersistence;
use crate::modules::events::adapters::outbound::persistence::disabled::DisabledEventPersistence;
use crate::modules::events::adapters::outbound::persistence::sqlite::SqliteEventPersistence;
use crate::modules::events::adapters::outbound::snapshot::json_file::JsonFileSnapshotStore;
use crate::modules::events::use_cases::load_events::handler::EventLoadingService;
use crate::modules::events::use_cases::unified_store::handler::UnifiedEventsStore;
use crate::shell::config::Settings;
use std::sync::Arc;

pub type EventsStore = UnifiedEventsStore<dyn EventsApi, dyn EventPersistence>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub cache: Arc<EventCache>,
    pub store: Arc<EventsStore>,
    pub loader: Arc<EventLoadingService<dyn EventsApi>>,
}

impl AppState {
    pub fn build(settings: Settings) -> Result<Self, RemoteError> {
        let api: Arc<dyn EventsApi> = Arc::new(HttpEventsApi::new(
            settings.api_base_url.clone(),
            settings.request_timeout(),
        )?);

        let persistence: Arc<dyn EventPersistence> = match &settings.database_path {
            Some(path) => Arc::new(SqliteEventPersistence::new(path.clone())),
            None => {
                tracing::info!("no database configured, durable storage disabled");
                Arc::new(DisabledEventPersistence)
            }
        };

        let cache = Arc::new(EventCache::new(settings.cache_ttl()));
        let mut store = UnifiedEventsStore::new(api.clone(), persistence, cache.clone());
        if let Some(path) = &settings.snapshot_path {
            store = store.with_snapshot_store(Arc::new(JsonFileSnapshotStore::new(path.clone())));
        }

        Ok(Self {
            settings,
            cache,
            store: Arc::new(store),
            loader: Arc::new(EventLoadingService::new(api)),
        })
    }
}
