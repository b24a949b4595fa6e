// HTTP implementation of the EventsApi port.

use crate::modules::events::adapters::outbound::events_api::{
    ActionResponse, EventsApi, EventsResponse, RemoteError, UpdateEventBody,
};
use crate::modules::events::core::event::{EventPatch, PublicEvent};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const EVENTS_PATH: &str = "/api/events";

#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    client: Client,
    base_url: String,
}

impl HttpEventsApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self) -> String {
        format!("{}{EVENTS_PATH}", self.base_url)
    }

    /// The id is pushed as one escaped path segment.
    fn bookmark_url(&self, id: &str) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.events_url()).map_err(|e| RemoteError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.clone()))?
            .push(id)
            .push("bookmark");
        Ok(url)
    }
}

/// Message for a failed reply: the body's `error` field, else `HTTP <status>`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ActionResponse>(body)
        .ok()
        .and_then(|reply| reply.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        });
    }
    Ok(response.json::<T>().await?)
}

fn ensure_success(success: bool, error: Option<String>, fallback: &str) -> Result<(), RemoteError> {
    if success {
        Ok(())
    } else {
        Err(RemoteError::Rejected(error.unwrap_or_else(|| fallback.to_string())))
    }
}

async fn expect_events(response: Response, fallback: &str) -> Result<Vec<PublicEvent>, RemoteError> {
    let reply: EventsResponse = decode(response).await?;
    ensure_success(reply.success, reply.error, fallback)?;
    Ok(reply.events)
}

async fn expect_action(response: Response, fallback: &str) -> Result<(), RemoteError> {
    let reply: ActionResponse = decode(response).await?;
    ensure_success(reply.success, reply.error, fallback)
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn load_month_events(&self, user_id: &str, month: u32, year: i32) -> Result<Vec<PublicEvent>, RemoteError> {
        tracing::debug!(user_id, month, year, "requesting month events");
        let response = self
            .client
            .get(self.events_url())
            .query(&[
                ("userId", user_id.to_string()),
                ("month", month.to_string()),
                ("year", year.to_string()),
            ])
            .send()
            .await?;
        expect_events(response, "Failed to load month events").await
    }

    async fn load_user_events(&self, user_id: &str) -> Result<Vec<PublicEvent>, RemoteError> {
        tracing::debug!(user_id, "requesting all events for user");
        let response = self
            .client
            .get(self.events_url())
            .query(&[("userId", user_id), ("tab", "all")])
            .send()
            .await?;
        expect_events(response, "Failed to load events").await
    }

    async fn save_event(&self, event: &PublicEvent) -> Result<(), RemoteError> {
        let response = self.client.post(self.events_url()).json(event).send().await?;
        expect_action(response, "Failed to save event").await
    }

    async fn update_event(&self, id: &str, user_id: &str, changes: &EventPatch) -> Result<(), RemoteError> {
        let body = UpdateEventBody {
            id: id.to_string(),
            user_id: user_id.to_string(),
            changes: changes.clone(),
        };
        let response = self.client.put(self.events_url()).json(&body).send().await?;
        expect_action(response, "Failed to update event").await
    }

    async fn delete_event(&self, id: &str, user_id: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.events_url())
            .query(&[("id", id), ("userId", user_id)])
            .send()
            .await?;
        expect_action(response, "Failed to delete event").await
    }

    async fn toggle_bookmark(&self, id: &str, user_id: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.bookmark_url(id)?)
            .query(&[("userId", user_id)])
            .send()
            .await?;
        expect_action(response, "Failed to toggle bookmark").await
    }
}

#[cfg(test)]
mod http_events_api_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::error_field(500, r#"{"success":false,"error":"Database unavailable"}"#, "Database unavailable")]
    #[case::no_error_field(404, r#"{"success":false}"#, "HTTP 404")]
    #[case::blank_error(400, r#"{"success":false,"error":"  "}"#, "HTTP 400")]
    #[case::not_json(502, "<html>Bad Gateway</html>", "HTTP 502")]
    fn it_should_extract_the_error_message(#[case] status: u16, #[case] body: &str, #[case] expected: &str) {
        assert_eq!(error_message(status, body), expected);
    }

    #[rstest]
    fn it_should_trim_the_trailing_slash_of_the_base_url() {
        let api = HttpEventsApi::with_client(Client::new(), "http://localhost:3000/");

        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.events_url(), "http://localhost:3000/api/events");
        assert_eq!(
            api.bookmark_url("e1").unwrap().as_str(),
            "http://localhost:3000/api/events/e1/bookmark"
        );
    }

    #[rstest]
    #[case::slash("a/b", "http://localhost:3000/api/events/a%2Fb/bookmark")]
    #[case::query("a?b", "http://localhost:3000/api/events/a%3Fb/bookmark")]
    #[case::fragment("a#b", "http://localhost:3000/api/events/a%23b/bookmark")]
    fn it_should_escape_the_id_inside_the_bookmark_path(#[case] id: &str, #[case] expected: &str) {
        let api = HttpEventsApi::with_client(Client::new(), "http://localhost:3000");

        let url = api.bookmark_url(id).unwrap();

        assert_eq!(url.as_str(), expected);
        assert_eq!(url.path_segments().unwrap().count(), 4);
    }

    #[rstest]
    fn it_should_reject_a_base_url_that_cannot_hold_a_path() {
        let api = HttpEventsApi::with_client(Client::new(), "not a url");

        assert!(matches!(api.bookmark_url("e1"), Err(RemoteError::InvalidUrl(_))));
    }

    #[rstest]
    fn it_should_reject_a_failure_flag_with_the_fallback_message() {
        let err = ensure_success(false, None, "Failed to save event").unwrap_err();
        assert!(matches!(err, RemoteError::Rejected(message) if message == "Failed to save event"));
        assert!(ensure_success(true, Some("ignored".into()), "x").is_ok());
    }
}
