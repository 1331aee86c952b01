use docgenie_core::api::ApiClient;

use crate::common::Epoch;
use crate::events::{ChatUiEvent, UiEvent};

/// Posts one chat message. Not cancellable; stale replies are dropped by epoch.
pub async fn send_chat(
    api: ApiClient,
    session_id: Option<String>,
    query: String,
    epoch: Epoch,
) -> UiEvent {
    let result = match session_id.as_deref() {
        Some(id) => api.session_chat(id, &query).await,
        None => api.fallback_chat(&query).await,
    };
    UiEvent::Chat(match result {
        Ok(response) => ChatUiEvent::Reply { epoch, response },
        Err(error) => ChatUiEvent::Failed { epoch, error },
    })
}
