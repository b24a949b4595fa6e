// Event shapes shared by every layer.
//
// - `PublicEvent` is the wire and display shape exchanged with the events API.
// - `UnifiedEvent` is the in-memory canonical shape: the same body plus metadata
//   describing provenance, persistence and sync state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Benefic,
    Challenging,
    Neutral,
    /// Anything the API sent that is not one of the three known categories.
    /// Kept so validation can report it instead of failing deserialization.
    #[serde(other)]
    Unrecognized,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Benefic => "benefic",
            Category::Challenging => "challenging",
            Category::Neutral => "neutral",
            Category::Unrecognized => "unrecognized",
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "benefic" => Category::Benefic,
            "challenging" => Category::Challenging,
            "neutral" => Category::Neutral,
            _ => Category::Unrecognized,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Remote,
    Generated,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Pending,
    Error,
}

/// Fields common to both event shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub aspects: Vec<String>,
    #[serde(default)]
    pub planetary_positions: Vec<String>,
    pub score: f64,
    #[serde(rename = "isGenerated", default)]
    pub generated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEvent {
    #[serde(flatten)]
    pub details: EventDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
}

impl PublicEvent {
    pub fn id(&self) -> &str {
        &self.details.id
    }

    pub fn bookmarked(&self) -> bool {
        self.is_bookmarked.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub source: EventSource,
    pub is_persisted: bool,
    pub is_bookmarked: bool,
    pub created_locally: bool,
    pub owning_user_id: String,
    pub last_modified: DateTime<Utc>,
    pub sync_status: SyncStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedEvent {
    #[serde(flatten)]
    pub details: EventDetails,
    pub metadata: EventMetadata,
}

impl UnifiedEvent {
    pub fn id(&self) -> &str {
        &self.details.id
    }
}

/// Partial update for an event. Absent fields are left untouched and are not
/// sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planetary_positions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    pub fn apply(&self, details: &mut EventDetails) {
        if let Some(title) = &self.title {
            details.title = title.clone();
        }
        if let Some(date) = &self.date {
            details.date = date.clone();
        }
        if let Some(time) = &self.time {
            details.time = Some(time.clone());
        }
        if let Some(category) = self.category {
            details.category = category;
        }
        if let Some(description) = &self.description {
            details.description = Some(description.clone());
        }
        if let Some(aspects) = &self.aspects {
            details.aspects = aspects.clone();
        }
        if let Some(positions) = &self.planetary_positions {
            details.planetary_positions = positions.clone();
        }
        if let Some(score) = self.score {
            details.score = score;
        }
    }
}
