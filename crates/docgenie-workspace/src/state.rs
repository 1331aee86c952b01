//! Controller state.
//!
//! `AppState` is the single explicit state object for one workspace. Only the
//! reducer mutates it; the render adapter reads it.

use docgenie_core::WorkspaceError;
use docgenie_core::api::{Session, SessionDetail};
use docgenie_core::config::Config;
use docgenie_core::layout::{PaneLayout, PaneResizeEngine};
use url::Url;

use crate::chat::ChatState;
use crate::common::{TaskSeq, Tasks, ViewEpoch};
use crate::sessions::SessionsState;
use crate::upload::UploadState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing loaded; the drop zone is shown.
    Idle,
    /// Bytes are being transmitted.
    Uploading,
    /// Transfer finished; the server is converting.
    Processing,
    /// A session is displayed.
    Loaded,
    /// The last operation failed. A previously loaded session may still be shown.
    Error,
}

/// What the main area currently shows.
///
/// `Loaded` always has a session. While an upload runs the session is parked
/// in the upload slice and `current_session` is empty.
#[derive(Debug, Clone)]
pub struct ActiveView {
    pub current_session: Option<Session>,
    pub view_state: ViewState,
}

impl Default for ActiveView {
    fn default() -> Self {
        Self {
            current_session: None,
            view_state: ViewState::Idle,
        }
    }
}

impl ActiveView {
    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session.as_ref().map(|s| s.id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast for the display surface to show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct AppState {
    pub view: ActiveView,
    pub sessions: SessionsState,
    pub upload: UploadState,
    pub chat: ChatState,
    pub layout: PaneResizeEngine,
    pub notifications: Vec<Notification>,
    pub epoch: ViewEpoch,
    pub tasks: Tasks,
    pub task_seq: TaskSeq,
    /// Server base URL, used to build links to original files.
    pub server_url: Option<Url>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            view: ActiveView::default(),
            sessions: SessionsState::default(),
            upload: UploadState::new(config.upload.into()),
            chat: ChatState::default(),
            layout: PaneResizeEngine::new(PaneLayout::from_config(&config.layout)),
            notifications: Vec::new(),
            epoch: ViewEpoch::default(),
            tasks: Tasks::default(),
            task_seq: TaskSeq::default(),
            server_url: Url::parse(config.server.base_url.trim()).ok(),
        }
    }

    /// True while an upload pipeline owns the view.
    pub fn upload_in_flight(&self) -> bool {
        matches!(
            self.view.view_state,
            ViewState::Uploading | ViewState::Processing
        ) || self.tasks.upload.is_running()
    }

    /// Displays `detail` and starts a new view epoch.
    pub fn apply_session(&mut self, detail: SessionDetail) {
        let SessionDetail { session, messages } = detail;
        tracing::info!(session_id = %session.id, messages = messages.len(), "session applied");
        self.sessions.set_active(Some(session.id.clone()));
        self.chat.replace(messages);
        self.view.current_session = Some(session);
        self.view.view_state = ViewState::Loaded;
        self.epoch.advance();
    }

    /// Clears the displayed session and transcript and returns to `Idle`.
    pub fn reset_view(&mut self) {
        self.view.current_session = None;
        self.view.view_state = ViewState::Idle;
        self.sessions.set_active(None);
        self.chat.reset();
        self.epoch.advance();
    }

    /// Surfaces `error` once and enters `Error`, unless an upload owns the view.
    pub fn fail(&mut self, context: &str, error: &WorkspaceError) {
        tracing::warn!(%error, context, "operation failed");
        self.notify(NotifyLevel::Error, format!("{context}: {error}"));
        if !self.upload_in_flight() {
            self.view.view_state = ViewState::Error;
        }
    }

    pub fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Absolute URL of the displayed session's original file.
    pub fn original_file_url(&self) -> Option<String> {
        let base = self.server_url.as_ref()?;
        let url = self.view.current_session.as_ref()?.original_file_url(base)?;
        Some(url.into())
    }
}
