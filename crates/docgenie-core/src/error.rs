//! Failure taxonomy for workspace operations.

use thiserror::Error;

/// Errors produced by uploads, session reads and chat calls.
///
/// `NoSupportedFiles` is a validation error: callers handle it at the edge,
/// before any view-state transition. Every other variant drives the
/// controller into its error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("Please upload supported file types (PDF, DOCX, PPTX, HTML, Images)")]
    NoSupportedFiles,

    #[error("No files processed successfully.")]
    EmptyResultSet,

    /// The last file of the batch failed; carries the server's message.
    #[error("{message}")]
    BatchPartialFailure { message: String },

    /// Network failure, abort, or a non-2xx status.
    #[error("{}", transport_message(*status, reason))]
    Transport { status: Option<u16>, reason: String },

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    /// The server answered with a body that does not match the contract.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Upload cancelled")]
    Cancelled,
}

impl WorkspaceError {
    pub fn transport(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Transport {
            status,
            reason: reason.into(),
        }
    }

    /// Returns true for the validation error that never reaches the state machine.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NoSupportedFiles)
    }
}

impl From<reqwest::Error> for WorkspaceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        let status = err.status().map(|s| s.as_u16());
        Self::Transport {
            status,
            reason: err.to_string(),
        }
    }
}

fn transport_message(status: Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("Request failed with status {code}: {reason}"),
        None => format!("Network error: {reason}"),
    }
}
