// In memory implementation of the EventsApi port.
//
// Purpose
// - Stand in for the events API in tests, counting every call so callers can
//   assert whether the network would have been hit.

use crate::modules::events::adapters::outbound::events_api::{EventsApi, RemoteError};
use crate::modules::events::core::event::{EventPatch, PublicEvent};
use crate::modules::events::core::validation::parse_event_date;
use async_trait::async_trait;
use chrono::Datelike;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiCalls {
    pub load_month: usize,
    pub load_user: usize,
    pub save: usize,
    pub update: usize,
    pub delete: usize,
    pub toggle_bookmark: usize,
}

#[derive(Default)]
struct Counters {
    load_month: AtomicUsize,
    load_user: AtomicUsize,
    save: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    toggle_bookmark: AtomicUsize,
}

#[derive(Default)]
pub struct InMemoryEventsApi {
    events: RwLock<Vec<PublicEvent>>,
    is_offline: AtomicBool,
    calls: Counters,
}

impl InMemoryEventsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<PublicEvent>) -> Self {
        Self {
            events: RwLock::new(events),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> ApiCalls {
        let c = &self.calls;
        ApiCalls {
            load_month: c.load_month.load(Ordering::SeqCst),
            load_user: c.load_user.load(Ordering::SeqCst),
            save: c.save.load(Ordering::SeqCst),
            update: c.update.load(Ordering::SeqCst),
            delete: c.delete.load(Ordering::SeqCst),
            toggle_bookmark: c.toggle_bookmark.load(Ordering::SeqCst),
        }
    }

    /// What the server currently holds.
    pub async fn events(&self) -> Vec<PublicEvent> {
        self.events.read().await.clone()
    }

    pub async fn event(&self, id: &str) -> Option<PublicEvent> {
        self.events.read().await.iter().find(|e| e.id() == id).cloned()
    }

    fn record(&self, counter: &AtomicUsize) -> Result<(), RemoteError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Status {
                status: 503,
                message: "Events API offline".into(),
            });
        }
        Ok(())
    }
}

fn not_found(id: &str) -> RemoteError {
    RemoteError::Status {
        status: 404,
        message: format!("Event {id} not found"),
    }
}

fn owned_by<'a>(event: &'a mut PublicEvent, id: &str, user_id: &str) -> Option<&'a mut PublicEvent> {
    (event.id() == id && event.details.user_id == user_id).then_some(event)
}

#[async_trait]
impl EventsApi for InMemoryEventsApi {
    async fn load_month_events(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<PublicEvent>, RemoteError> {
        self.record(&self.calls.load_month)?;
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.details.user_id == user_id)
            .filter(|event| {
                parse_event_date(&event.details.date)
                    .is_some_and(|date| date.month0() == month && date.year() == year)
            })
            .cloned()
            .collect())
    }

    async fn load_user_events(&self, user_id: &str) -> Result<Vec<PublicEvent>, RemoteError> {
        self.record(&self.calls.load_user)?;
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|event| event.details.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_event(&self, event: &PublicEvent) -> Result<(), RemoteError> {
        self.record(&self.calls.save)?;
        let mut events = self.events.write().await;
        match events.iter_mut().find(|existing| existing.id() == event.id()) {
            Some(existing) => *existing = event.clone(),
            None => events.push(event.clone()),
        }
        Ok(())
    }

    async fn update_event(&self, id: &str, user_id: &str, changes: &EventPatch) -> Result<(), RemoteError> {
        self.record(&self.calls.update)?;
        let mut events = self.events.write().await;
        let event = events
            .iter_mut()
            .find_map(|event| owned_by(event, id, user_id))
            .ok_or_else(|| not_found(id))?;
        changes.apply(&mut event.details);
        Ok(())
    }

    async fn delete_event(&self, id: &str, user_id: &str) -> Result<(), RemoteError> {
        self.record(&self.calls.delete)?;
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| !(event.id() == id && event.details.user_id == user_id));
        if events.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn toggle_bookmark(&self, id: &str, user_id: &str) -> Result<(), RemoteError> {
        self.record(&self.calls.toggle_bookmark)?;
        let mut events = self.events.write().await;
        let event = events
            .iter_mut()
            .find_map(|event| owned_by(event, id, user_id))
            .ok_or_else(|| not_found(id))?;
        event.is_bookmarked = Some(!event.bookmarked());
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_events_api_tests {
    use super::*;
    use crate::tests::fixtures::events::PublicEventBuilder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> InMemoryEventsApi {
        InMemoryEventsApi::with_events(vec![
            PublicEventBuilder::new().id("jan").user_id("u1").date("2025-01-20").build(),
            PublicEventBuilder::new().id("feb").user_id("u1").date("2025-02-03").build(),
            PublicEventBuilder::new().id("other").user_id("u2").date("2025-01-21").build(),
        ])
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_load_a_zero_based_month_for_one_user(before_each: InMemoryEventsApi) {
        let api = before_each;

        let january = api.load_month_events("u1", 0, 2025).await.unwrap();

        assert_eq!(january.iter().map(|e| e.id()).collect::<Vec<_>>(), vec!["jan"]);
        assert_eq!(api.calls().load_month, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_load_every_event_of_a_user(before_each: InMemoryEventsApi) {
        let api = before_each;

        assert_eq!(api.load_user_events("u1").await.unwrap().len(), 2);
        assert!(api.load_user_events("nobody").await.unwrap().is_empty());
        assert_eq!(api.calls().load_user, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_upsert_update_and_delete(before_each: InMemoryEventsApi) {
        let api = before_each;
        let renamed = PublicEventBuilder::new().id("jan").user_id("u1").title("Renamed").build();

        api.save_event(&renamed).await.unwrap();
        assert_eq!(api.events().await.len(), 3);
        assert_eq!(api.event("jan").await.unwrap().details.title, "Renamed");

        let patch = EventPatch {
            score: Some(9.0),
            ..EventPatch::default()
        };
        api.update_event("jan", "u1", &patch).await.unwrap();
        assert_eq!(api.event("jan").await.unwrap().details.score, 9.0);

        api.delete_event("jan", "u1").await.unwrap();
        assert!(api.event("jan").await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_missing_events_as_not_found(before_each: InMemoryEventsApi) {
        let api = before_each;

        let err = api.delete_event("other", "u1").await.unwrap_err();

        assert!(matches!(err, RemoteError::Status { status: 404, .. }));
        assert!(api.event("other").await.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_toggle_the_bookmark_server_side(before_each: InMemoryEventsApi) {
        let api = before_each;

        api.toggle_bookmark("feb", "u1").await.unwrap();
        assert!(api.event("feb").await.unwrap().bookmarked());

        api.toggle_bookmark("feb", "u1").await.unwrap();
        assert!(!api.event("feb").await.unwrap().bookmarked());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_and_still_count_if_offline(before_each: InMemoryEventsApi) {
        let api = before_each;
        api.toggle_offline();

        let err = api.load_month_events("u1", 0, 2025).await.unwrap_err();

        assert!(err.to_string().contains("Events API offline"));
        assert_eq!(api.calls().load_month, 1);
    }
}
