// Pure transforms over events. No I/O, no shared state.

use crate::modules::events::core::event::{
    EventMetadata, EventSource, PublicEvent, SyncStatus, UnifiedEvent,
};
use crate::modules::events::core::filter::EventFilter;
use crate::modules::events::core::validation::{parse_event_date, parse_event_time};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn to_unified_event(event: PublicEvent, source: EventSource, is_bookmarked: bool) -> UnifiedEvent {
    let owning_user_id = event.details.user_id.clone();
    UnifiedEvent {
        details: event.details,
        metadata: EventMetadata {
            source,
            is_persisted: source == EventSource::Remote || is_bookmarked,
            is_bookmarked,
            created_locally: matches!(source, EventSource::Generated | EventSource::Manual),
            owning_user_id,
            last_modified: Utc::now(),
            sync_status: if source == EventSource::Remote {
                SyncStatus::Synced
            } else {
                SyncStatus::Pending
            },
        },
    }
}

pub fn to_public_event(event: &UnifiedEvent) -> PublicEvent {
    PublicEvent {
        details: event.details.clone(),
        is_bookmarked: Some(event.metadata.is_bookmarked),
    }
}

pub fn toggle_bookmark(event: &UnifiedEvent) -> UnifiedEvent {
    let mut toggled = event.clone();
    let metadata = &mut toggled.metadata;
    metadata.is_bookmarked = !metadata.is_bookmarked;
    metadata.is_persisted = metadata.is_bookmarked || metadata.source == EventSource::Remote;
    metadata.last_modified = Utc::now();
    if metadata.source != EventSource::Remote {
        metadata.sync_status = SyncStatus::Pending;
    }
    toggled
}

pub fn filter_events(events: &[UnifiedEvent], filter: &EventFilter) -> Vec<UnifiedEvent> {
    let range = filter.date_range.as_ref().map(|range| {
        (parse_event_date(&range.start), parse_event_date(&range.end))
    });

    events
        .iter()
        .filter(|event| {
            filter
                .source
                .is_none_or(|source| source.matches(event.metadata.source))
        })
        .filter(|event| {
            filter
                .is_bookmarked
                .is_none_or(|bookmarked| event.metadata.is_bookmarked == bookmarked)
        })
        .filter(|event| {
            filter
                .category
                .is_none_or(|category| category.matches(event.details.category))
        })
        .filter(|event| {
            filter
                .owning_user_id
                .as_deref()
                .is_none_or(|user_id| event.metadata.owning_user_id == user_id)
        })
        .filter(|event| match range {
            None => true,
            Some((start, end)) => match parse_event_date(&event.details.date) {
                None => false,
                Some(date) => {
                    start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
                }
            },
        })
        .cloned()
        .collect()
}

fn sort_key(event: &UnifiedEvent) -> Option<NaiveDateTime> {
    let date = parse_event_date(&event.details.date)?;
    let time = event
        .details
        .time
        .as_deref()
        .and_then(parse_event_time)
        .unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

/// Latest first. A missing time counts as `00:00`; unparsable dates sort last.
pub fn sort_by_date(events: &[UnifiedEvent]) -> Vec<UnifiedEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    sorted
}

/// Highest score first.
pub fn sort_by_score(events: &[UnifiedEvent]) -> Vec<UnifiedEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| {
        b.details
            .score
            .partial_cmp(&a.details.score)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Union keyed by id. When both sides hold an id, `b`'s entry wins with no
/// timestamp comparison, so callers pass the more authoritative set as `b`.
///
/// Order: `a`'s ids first (overridden in place), then ids only present in `b`.
pub fn merge_events(a: &[UnifiedEvent], b: &[UnifiedEvent]) -> Vec<UnifiedEvent> {
    let mut merged: Vec<UnifiedEvent> = Vec::with_capacity(a.len() + b.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(a.len() + b.len());

    for event in a.iter().chain(b.iter()) {
        match positions.get(event.id()) {
            Some(&index) => merged[index] = event.clone(),
            None => {
                positions.insert(event.id().to_string(), merged.len());
                merged.push(event.clone());
            }
        }
    }

    merged
}
