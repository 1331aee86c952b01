//! Workspace reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, NotifyLevel};
use crate::{chat, layout, sessions, upload};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::DropFiles { files } => upload::handle_drop(app, files),
        UiEvent::CancelUpload => upload::handle_cancel(app),
        UiEvent::SetUploadOptions(options) => upload::handle_set_options(app, options),
        UiEvent::RefreshSessions => sessions::handle_refresh(),
        UiEvent::FilterSessions { query } => sessions::handle_filter(app, query),
        UiEvent::PickSession { session_id } => sessions::handle_pick(app, session_id),
        UiEvent::DeleteSession { session_id } => sessions::handle_delete(app, session_id),
        UiEvent::SendChat { text } => chat::handle_send(app, &text),
        UiEvent::ViewOriginal => handle_view_original(app),
        UiEvent::Reset => handle_reset(app),
        UiEvent::Layout(event) => layout::handle_event(app, event),

        UiEvent::Sessions(event) => sessions::handle_event(app, event),
        UiEvent::Upload(event) => upload::handle_event(app, event),
        UiEvent::Chat(event) => chat::handle_event(app, event),

        UiEvent::TaskStarted { kind, started } => {
            app.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, "ignoring result of superseded task");
                vec![]
            }
        }
    }
}

/// "New chat": cancels any upload first, then clears the view.
fn handle_reset(app: &mut AppState) -> Vec<UiEffect> {
    let effects = upload::abort_upload(app);
    app.tasks.session_load.clear();
    app.reset_view();
    effects
}

fn handle_view_original(app: &mut AppState) -> Vec<UiEffect> {
    if let Some(url) = app.original_file_url() {
        vec![UiEffect::OpenBrowser { url }]
    } else {
        app.notify(
            NotifyLevel::Warning,
            "No file available to view. File might be local only.",
        );
        vec![]
    }
}
