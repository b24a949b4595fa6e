use crate::modules::events::adapters::outbound::events_api::RemoteError;
use crate::modules::events::adapters::outbound::persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("event failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("event {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
