//! Chat feature reducer.

use crate::effects::UiEffect;
use crate::events::ChatUiEvent;
use crate::state::{AppState, NotifyLevel, ViewState};

/// Appends the user's message optimistically and posts it.
///
/// Goes to the active session's chat when one is displayed, otherwise to the
/// session-less endpoint.
pub fn handle_send(app: &mut AppState, text: &str) -> Vec<UiEffect> {
    let query = text.trim();
    if query.is_empty() {
        return vec![];
    }
    if app.upload_in_flight() {
        app.notify(
            NotifyLevel::Warning,
            "Please wait for the current upload to finish.",
        );
        return vec![];
    }

    app.chat.push_user(query);
    let session_id = app.view.current_session_id().map(str::to_string);
    tracing::debug!(session_id = ?session_id, "sending chat message");

    vec![UiEffect::SendChat {
        session_id,
        query: query.to_string(),
        epoch: app.epoch.current(),
    }]
}

pub fn handle_event(app: &mut AppState, event: ChatUiEvent) -> Vec<UiEffect> {
    match event {
        ChatUiEvent::Reply { epoch, response } => {
            if !app.epoch.is_current(epoch) {
                tracing::debug!("dropping chat reply for a previous view");
                return vec![];
            }
            app.chat.push_reply(response);
            if app.view.view_state == ViewState::Error && app.view.current_session.is_some() {
                app.view.view_state = ViewState::Loaded;
            }
            vec![]
        }
        ChatUiEvent::Failed { epoch, error } => {
            if !app.epoch.is_current(epoch) {
                return vec![];
            }
            app.chat.mark_failed();
            app.fail("Error getting response from AI", &error);
            vec![]
        }
    }
}
