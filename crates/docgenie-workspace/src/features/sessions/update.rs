//! Sessions feature reducer.
//!
//! Handles list refreshes, filtering, loading a session into the view and
//! deleting sessions.

use crate::effects::UiEffect;
use crate::events::SessionsUiEvent;
use crate::state::{AppState, NotifyLevel};

pub fn handle_refresh() -> Vec<UiEffect> {
    vec![UiEffect::RefreshSessions]
}

pub fn handle_filter(app: &mut AppState, query: String) -> Vec<UiEffect> {
    app.sessions.set_filter(query);
    vec![]
}

/// Starts loading `session_id`. Rejected while an upload owns the view.
pub fn handle_pick(app: &mut AppState, session_id: String) -> Vec<UiEffect> {
    if app.upload_in_flight() {
        app.notify(
            NotifyLevel::Warning,
            "Please wait for the current upload to finish.",
        );
        return vec![];
    }

    tracing::debug!(%session_id, "loading session");
    vec![UiEffect::LoadSession {
        task: app.task_seq.next_id(),
        session_id,
        epoch: app.epoch.current(),
    }]
}

pub fn handle_delete(app: &mut AppState, session_id: String) -> Vec<UiEffect> {
    vec![UiEffect::DeleteSession {
        task: app.task_seq.next_id(),
        session_id,
    }]
}

pub fn handle_event(app: &mut AppState, event: SessionsUiEvent) -> Vec<UiEffect> {
    match event {
        SessionsUiEvent::ListLoaded { sessions } => {
            app.sessions.replace_list(sessions);
            vec![]
        }
        SessionsUiEvent::ListFailed { error } => {
            app.fail("Failed to load sessions", &error);
            vec![]
        }
        SessionsUiEvent::Loaded { epoch, detail } => {
            if !app.epoch.is_current(epoch) || app.upload_in_flight() {
                tracing::debug!(session_id = %detail.session.id, "dropping stale session load");
                return vec![];
            }
            app.apply_session(detail);
            vec![]
        }
        SessionsUiEvent::LoadFailed {
            epoch,
            session_id,
            error,
        } => {
            if !app.epoch.is_current(epoch) {
                tracing::debug!(%session_id, "dropping stale session load failure");
                return vec![];
            }
            // The previously displayed session, if any, stays visible.
            app.fail("Failed to load session", &error);
            vec![]
        }
        SessionsUiEvent::Deleted {
            session_id,
            sessions,
        } => handle_deleted(app, &session_id, sessions),
        SessionsUiEvent::DeleteFailed { session_id, error } => {
            tracing::warn!(%session_id, %error, "delete failed");
            app.notify(
                NotifyLevel::Error,
                format!("Failed to delete session: {error}"),
            );
            vec![]
        }
    }
}

fn handle_deleted(
    app: &mut AppState,
    session_id: &str,
    sessions: Option<Vec<docgenie_core::api::SessionSummary>>,
) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    match sessions {
        Some(sessions) => app.sessions.replace_list(sessions),
        None => effects.push(UiEffect::RefreshSessions),
    }

    if app.view.current_session_id() == Some(session_id) {
        app.reset_view();
    }
    app.upload.forget_parked_session(session_id);
    if app.sessions.active_id() == Some(session_id) {
        app.sessions.set_active(None);
    }

    app.notify(NotifyLevel::Success, "Session deleted");
    effects
}
