#![allow(dead_code)]

use astro_events::modules::events::core::event::{Category, EventDetails, PublicEvent};
use chrono::{TimeZone, Utc};

pub fn public_event(id: &str, user_id: &str, date: &str) -> PublicEvent {
    PublicEvent {
        details: EventDetails {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Sun sextile Mars".to_string(),
            date: date.to_string(),
            time: Some("14:00".to_string()),
            category: Category::Benefic,
            description: None,
            aspects: vec!["sextile".to_string()],
            planetary_positions: vec!["Sun 10 Aquarius".to_string(), "Mars 10 Aries".to_string()],
            score: 7.0,
            generated: false,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        },
        is_bookmarked: None,
    }
}

pub fn bookmarked(mut event: PublicEvent) -> PublicEvent {
    event.is_bookmarked = Some(true);
    event
}
