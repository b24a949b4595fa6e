// Remote events API port.
//
// Purpose
// - The only boundary that talks to the network.
//
// Responsibilities
// - Month loads, full user loads, upsert, partial update, delete and bookmark
//   toggling against the events API.
// - Map non-success replies into `RemoteError` with the server's message.
//
// Boundaries
// - No retries here. Retry and backoff belong to the caller.

pub mod http;
pub mod in_memory;

use crate::modules::events::core::event::{EventPatch, PublicEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("events API replied {status}: {message}")]
    Status { status: u16, message: String },

    #[error("events API rejected the request: {0}")]
    Rejected(String),

    #[error("events API transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("events API URL is invalid: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait EventsApi: Send + Sync {
    /// `month` is zero-based.
    async fn load_month_events(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<PublicEvent>, RemoteError>;
    async fn load_user_events(&self, user_id: &str) -> Result<Vec<PublicEvent>, RemoteError>;
    /// Upsert by id.
    async fn save_event(&self, event: &PublicEvent) -> Result<(), RemoteError>;
    async fn update_event(&self, id: &str, user_id: &str, changes: &EventPatch) -> Result<(), RemoteError>;
    async fn delete_event(&self, id: &str, user_id: &str) -> Result<(), RemoteError>;
    /// The server decides the new bookmark state.
    async fn toggle_bookmark(&self, id: &str, user_id: &str) -> Result<(), RemoteError>;
}

/// Reply to the two load routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub success: bool,
    #[serde(default)]
    pub events: Vec<PublicEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply to every write route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventBody {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub changes: EventPatch,
}
