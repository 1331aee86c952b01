//! Workspace event types.
//!
//! Every input to the controller, whether a user intent or an async result,
//! is a `UiEvent` processed by [`crate::update::update`].
//!
//! ## Task Lifecycle Events
//!
//! Async work uses a uniform lifecycle:
//! - The runtime emits `UiEvent::TaskStarted` once a task is actually spawned
//! - The runtime emits `UiEvent::TaskCompleted` with the result event when done
//! - The reducer is the only place that mutates `TaskState`
//!
//! ## Stale results
//!
//! Results that belong to a view the user has since left carry the
//! [`Epoch`] they were issued under; the reducer drops them when it no
//! longer matches.

use docgenie_core::WorkspaceError;
use docgenie_core::api::{FileOutcome, SessionDetail, SessionSummary};
use docgenie_core::layout::{Divider, PointerKind};
use docgenie_core::upload::{SelectedFile, UploadOptions, UploadProgress};

use crate::common::{Epoch, TaskCompleted, TaskId, TaskKind, TaskStarted};

/// Pointer and container events for the pane layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutUiEvent {
    /// The pane container was measured (or re-measured).
    ContainerResized { width: f64 },
    /// Mouse-down or touch-start on a divider.
    DragStarted {
        divider: Divider,
        kind: PointerKind,
        x: f64,
    },
    PointerMoved { x: f64 },
    /// Mouse-up or touch-end anywhere.
    DragEnded,
}

/// Session list and detail results.
#[derive(Debug)]
pub enum SessionsUiEvent {
    ListLoaded {
        sessions: Vec<SessionSummary>,
    },
    ListFailed {
        error: WorkspaceError,
    },
    Loaded {
        epoch: Epoch,
        detail: SessionDetail,
    },
    LoadFailed {
        epoch: Epoch,
        session_id: String,
        error: WorkspaceError,
    },
    /// Session removed; carries the refreshed list when it could be fetched.
    Deleted {
        session_id: String,
        sessions: Option<Vec<SessionSummary>>,
    },
    DeleteFailed {
        session_id: String,
        error: WorkspaceError,
    },
}

/// Upload pipeline results.
#[derive(Debug)]
pub enum UploadUiEvent {
    /// Transfer progress for the upload task `task`.
    Progress {
        task: TaskId,
        progress: UploadProgress,
    },
    /// Batch converted, list refreshed and resulting session loaded.
    Completed {
        outcomes: Vec<FileOutcome>,
        sessions: Vec<SessionSummary>,
        detail: SessionDetail,
    },
    Failed {
        error: WorkspaceError,
    },
}

/// Chat exchange results.
#[derive(Debug)]
pub enum ChatUiEvent {
    Reply { epoch: Epoch, response: String },
    Failed { epoch: Epoch, error: WorkspaceError },
}

/// Unified event enum for the workspace.
#[derive(Debug)]
pub enum UiEvent {
    // User intents
    DropFiles { files: Vec<SelectedFile> },
    CancelUpload,
    SetUploadOptions(UploadOptions),
    RefreshSessions,
    FilterSessions { query: String },
    PickSession { session_id: String },
    DeleteSession { session_id: String },
    SendChat { text: String },
    ViewOriginal,
    Reset,
    Layout(LayoutUiEvent),

    // Async results
    Sessions(SessionsUiEvent),
    Upload(UploadUiEvent),
    Chat(ChatUiEvent),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
