use docgenie_core::api::ApiClient;

use crate::common::Epoch;
use crate::events::{SessionsUiEvent, UiEvent};

/// Fetches the full session list.
pub async fn session_list_load(api: ApiClient) -> UiEvent {
    UiEvent::Sessions(match api.list_sessions().await {
        Ok(sessions) => SessionsUiEvent::ListLoaded { sessions },
        Err(error) => SessionsUiEvent::ListFailed { error },
    })
}

/// Fetches a session and its transcript, tagged with the epoch it was issued in.
pub async fn session_load(api: ApiClient, session_id: String, epoch: Epoch) -> UiEvent {
    UiEvent::Sessions(match api.get_session(&session_id).await {
        Ok(detail) => SessionsUiEvent::Loaded { epoch, detail },
        Err(error) => SessionsUiEvent::LoadFailed {
            epoch,
            session_id,
            error,
        },
    })
}

/// Deletes a session, then refreshes the list.
///
/// A failed refresh does not fail the delete; the reducer asks for another
/// refresh instead.
pub async fn session_delete(api: ApiClient, session_id: String) -> UiEvent {
    if let Err(error) = api.delete_session(&session_id).await {
        return UiEvent::Sessions(SessionsUiEvent::DeleteFailed { session_id, error });
    }
    let sessions = match api.list_sessions().await {
        Ok(sessions) => Some(sessions),
        Err(error) => {
            tracing::warn!(%error, "list refresh after delete failed");
            None
        }
    };
    UiEvent::Sessions(SessionsUiEvent::Deleted {
        session_id,
        sessions,
    })
}
