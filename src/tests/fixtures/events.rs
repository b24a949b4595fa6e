// Shared test fixture for events.
// Compiled only for unit tests through `crate::tests::fixtures`.

use crate::modules::events::core::event::{Category, EventDetails, PublicEvent};
use chrono::{TimeZone, Utc};

pub struct PublicEventBuilder {
    inner: PublicEvent,
}

impl Default for PublicEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl PublicEventBuilder {
    pub fn new() -> Self {
        Self {
            inner: PublicEvent {
                details: EventDetails {
                    id: "evt-fixed-0001".to_string(),
                    user_id: "user-fixed-0001".to_string(),
                    title: "Venus trine Jupiter".to_string(),
                    date: "2025-01-20".to_string(),
                    time: Some("09:30".to_string()),
                    category: Category::Neutral,
                    description: Some("A gentle opening".to_string()),
                    aspects: vec!["Venus trine Jupiter".to_string()],
                    planetary_positions: vec!["Venus in Pisces".to_string()],
                    score: 5.0,
                    generated: false,
                    created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                },
                is_bookmarked: None,
            },
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.details.id = v.into();
        self
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.inner.details.user_id = v.into();
        self
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.details.title = v.into();
        self
    }

    pub fn date(mut self, v: impl Into<String>) -> Self {
        self.inner.details.date = v.into();
        self
    }

    pub fn time(mut self, v: Option<&str>) -> Self {
        self.inner.details.time = v.map(str::to_string);
        self
    }

    pub fn category(mut self, v: Category) -> Self {
        self.inner.details.category = v;
        self
    }

    pub fn score(mut self, v: f64) -> Self {
        self.inner.details.score = v;
        self
    }

    pub fn generated(mut self, v: bool) -> Self {
        self.inner.details.generated = v;
        self
    }

    pub fn bookmarked(mut self, v: bool) -> Self {
        self.inner.is_bookmarked = Some(v);
        self
    }

    pub fn build(self) -> PublicEvent {
        self.inner
    }
}
