//! Batch upload lifecycle: drop, progress, completion, cancellation.

mod state;
mod update;

pub use state::{ParkedView, UploadState};
pub use update::{abort_upload, handle_cancel, handle_drop, handle_event, handle_set_options};
