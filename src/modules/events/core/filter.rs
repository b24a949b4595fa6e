use crate::modules::events::core::event::{Category, EventSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    #[default]
    All,
    Remote,
    Generated,
    Manual,
}

impl SourceFilter {
    pub fn matches(&self, source: EventSource) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Remote => source == EventSource::Remote,
            SourceFilter::Generated => source == EventSource::Generated,
            SourceFilter::Manual => source == EventSource::Manual,
        }
    }
}

impl From<EventSource> for SourceFilter {
    fn from(source: EventSource) -> Self {
        match source {
            EventSource::Remote => SourceFilter::Remote,
            EventSource::Generated => SourceFilter::Generated,
            EventSource::Manual => SourceFilter::Manual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Benefic,
    Challenging,
    Neutral,
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Benefic => category == Category::Benefic,
            CategoryFilter::Challenging => category == Category::Challenging,
            CategoryFilter::Neutral => category == Category::Neutral,
        }
    }
}

/// Inclusive calendar range, both ends as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Every criterion that is set must match. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owning_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl EventFilter {
    pub fn bookmarked() -> Self {
        Self {
            is_bookmarked: Some(true),
            ..Self::default()
        }
    }

    pub fn source(source: EventSource) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }
}
