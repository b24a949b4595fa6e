// Tab-aware loading straight from the events API.
//
// Boundaries
// - Bypasses the unified store and its month cache. Callers that want the
//   cached, merged view go through the store instead.

use crate::modules::events::adapters::outbound::events_api::{EventsApi, RemoteError};
use crate::modules::events::core::event::PublicEvent;
use crate::modules::events::use_cases::load_events::filters::{
    FilterOptions, LoadingStrategy, apply_filters, loading_strategy,
};
use crate::shared::core::clock::{Clock, SystemClock};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadEventsQuery {
    pub user_id: String,
    /// Zero-based. Used only with `year`.
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedEvents {
    pub events: Vec<PublicEvent>,
    pub total_count: usize,
    pub has_more: bool,
}

pub struct EventLoadingService<TApi>
where
    TApi: EventsApi + ?Sized + 'static,
{
    api: Arc<TApi>,
    clock: Arc<dyn Clock>,
}

impl<TApi> EventLoadingService<TApi>
where
    TApi: EventsApi + ?Sized + 'static,
{
    pub fn new(api: Arc<TApi>) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    pub fn with_clock(api: Arc<TApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    pub async fn load_all_user_events(&self, user_id: &str) -> Result<Vec<PublicEvent>, RemoteError> {
        self.api.load_user_events(user_id).await.inspect_err(|error| {
            tracing::error!(user_id, %error, "loading user events failed");
        })
    }

    pub async fn load_month_events(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<PublicEvent>, RemoteError> {
        self.api.load_month_events(user_id, month, year).await.inspect_err(|error| {
            tracing::error!(user_id, month, year, %error, "loading month events failed");
        })
    }

    pub async fn load_filtered_events(&self, query: &LoadEventsQuery) -> Result<LoadedEvents, RemoteError> {
        let strategy = loading_strategy(query.filters.tab);
        let events = match (strategy, query.month, query.year) {
            (LoadingStrategy::User, _, _) => self.load_all_user_events(&query.user_id).await?,
            (LoadingStrategy::Month, Some(month), Some(year)) => {
                self.load_month_events(&query.user_id, month, year).await?
            }
            (LoadingStrategy::Month, _, _) => {
                let today = self.clock.now().date_naive();
                self.load_month_events(&query.user_id, today.month0(), today.year()).await?
            }
        };

        let events = apply_filters(&events, &query.filters);
        tracing::debug!(user_id = %query.user_id, ?strategy, count = events.len(), "filtered events loaded");
        Ok(LoadedEvents {
            total_count: events.len(),
            events,
            has_more: false,
        })
    }
}
