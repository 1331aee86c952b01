//! Effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer itself never
//! touches the network.
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`.
//! The runtime executes it by calling `token.cancel()` on the provided token.

use docgenie_core::upload::{UploadBatch, UploadOptions};
use tokio_util::sync::CancellationToken;

use crate::common::{Epoch, TaskId, TaskKind};

#[derive(Debug)]
pub enum UiEffect {
    /// Fetch the session list; the newest response to resolve wins.
    RefreshSessions,

    /// Fetch a session's detail and transcript.
    LoadSession {
        task: TaskId,
        session_id: String,
        epoch: Epoch,
    },

    /// Delete a session, then refresh the list.
    DeleteSession { task: TaskId, session_id: String },

    /// Upload, refresh the list and load the resulting session, in that order.
    StartUpload {
        task: TaskId,
        batch: UploadBatch,
        options: UploadOptions,
    },

    /// Post a chat message, scoped to `session_id` when present.
    SendChat {
        session_id: Option<String>,
        query: String,
        epoch: Epoch,
    },

    /// Open a URL in the system browser.
    OpenBrowser { url: String },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
