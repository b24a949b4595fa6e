use crate::modules::events::core::event::{Category, EventSource, UnifiedEvent};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub generated: usize,
    pub manual: usize,
    pub remote: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub benefic: usize,
    pub challenging: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total: usize,
    pub bookmarked: usize,
    pub sources: SourceCounts,
    pub categories: CategoryCounts,
    pub average_score: f64,
}

pub fn calculate_stats(events: &[UnifiedEvent]) -> EventStats {
    let mut stats = EventStats {
        total: events.len(),
        ..EventStats::default()
    };
    let mut score_sum = 0.0;

    for event in events {
        if event.metadata.is_bookmarked {
            stats.bookmarked += 1;
        }
        match event.metadata.source {
            EventSource::Generated => stats.sources.generated += 1,
            EventSource::Manual => stats.sources.manual += 1,
            EventSource::Remote => stats.sources.remote += 1,
        }
        match event.details.category {
            Category::Benefic => stats.categories.benefic += 1,
            Category::Challenging => stats.categories.challenging += 1,
            Category::Neutral => stats.categories.neutral += 1,
            Category::Unrecognized => {}
        }
        score_sum += event.details.score;
    }

    if stats.total > 0 {
        let average = score_sum / stats.total as f64;
        stats.average_score = (average * 100.0).round() / 100.0;
    }

    stats
}
