//! Upload feature reducer.

use docgenie_core::WorkspaceError;
use docgenie_core::api::FileOutcome;
use docgenie_core::upload::{self, SelectedFile, UploadOptions, UploadProgress};

use super::ParkedView;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UploadUiEvent;
use crate::state::{AppState, NotifyLevel, ViewState};

/// Validates a drop and starts the upload pipeline.
///
/// Only one pipeline runs at a time; a drop while one is in flight is
/// rejected and leaves the running batch untouched.
pub fn handle_drop(app: &mut AppState, files: Vec<SelectedFile>) -> Vec<UiEffect> {
    if app.upload_in_flight() {
        app.notify(NotifyLevel::Warning, "An upload is already in progress.");
        return vec![];
    }

    let batch = match upload::validate(files) {
        Ok(batch) => batch,
        Err(error) if error.is_validation() => {
            app.notify(NotifyLevel::Warning, error.to_string());
            return vec![];
        }
        Err(error) => {
            app.fail("Upload failed", &error);
            return vec![];
        }
    };

    tracing::info!(
        files = batch.len(),
        bytes = batch.total_bytes(),
        "upload started"
    );
    let parked = ParkedView {
        session: app.view.current_session.take(),
        view_state: app.view.view_state,
    };
    app.upload.begin(parked, batch.len());
    app.view.view_state = ViewState::Uploading;

    vec![UiEffect::StartUpload {
        task: app.task_seq.next_id(),
        batch,
        options: app.upload.options(),
    }]
}

pub fn handle_set_options(app: &mut AppState, options: UploadOptions) -> Vec<UiEffect> {
    app.upload.set_options(options);
    vec![]
}

/// User-initiated cancel: abort the transfer and put the previous view back.
pub fn handle_cancel(app: &mut AppState) -> Vec<UiEffect> {
    if !app.upload_in_flight() {
        return vec![];
    }
    let effects = cancel_task(app);
    restore_parked(app);
    app.notify(NotifyLevel::Info, "Upload cancelled");
    effects
}

/// Aborts a running upload without restoring anything. Used by reset.
pub fn abort_upload(app: &mut AppState) -> Vec<UiEffect> {
    if !app.upload_in_flight() {
        return vec![];
    }
    let effects = cancel_task(app);
    app.upload.finish();
    effects
}

fn cancel_task(app: &mut AppState) -> Vec<UiEffect> {
    let token = app.tasks.upload.cancel.clone();
    app.tasks.upload.clear();
    tracing::info!("cancelling upload");
    vec![UiEffect::CancelTask {
        kind: TaskKind::Upload,
        token,
    }]
}

fn restore_parked(app: &mut AppState) {
    match app.upload.finish() {
        Some(parked) => {
            app.view.current_session = parked.session;
            app.view.view_state = parked.view_state;
        }
        None => app.view.view_state = ViewState::Idle,
    }
}

pub fn handle_event(app: &mut AppState, event: UploadUiEvent) -> Vec<UiEffect> {
    match event {
        UploadUiEvent::Progress { task, progress } => {
            if !app.tasks.upload.is_active(task) {
                return vec![];
            }
            match progress {
                UploadProgress::Percent(percent) => app.upload.record_progress(percent),
                UploadProgress::Transmitted => {
                    if app.view.view_state == ViewState::Uploading {
                        tracing::debug!("transfer complete, server processing");
                        app.view.view_state = ViewState::Processing;
                    }
                }
            }
            vec![]
        }
        UploadUiEvent::Completed {
            outcomes,
            sessions,
            detail,
        } => {
            app.upload.finish();
            app.sessions.replace_list(sessions);
            report_skipped_files(app, &outcomes);
            app.apply_session(detail);
            app.notify(NotifyLevel::Success, "Document processed successfully!");
            vec![]
        }
        UploadUiEvent::Failed {
            error: WorkspaceError::Cancelled,
        } => {
            restore_parked(app);
            app.notify(NotifyLevel::Info, "Upload cancelled");
            vec![]
        }
        UploadUiEvent::Failed { error } => {
            tracing::warn!(%error, "upload failed");
            restore_parked(app);
            app.view.view_state = ViewState::Error;
            app.notify(NotifyLevel::Error, format!("Upload failed: {error}"));
            vec![]
        }
    }
}

/// Earlier files in a successful batch may still have failed.
fn report_skipped_files(app: &mut AppState, outcomes: &[FileOutcome]) {
    let Some((_, earlier)) = outcomes.split_last() else {
        return;
    };
    for outcome in earlier {
        if let FileOutcome::Error { message, .. } = outcome {
            app.notify(
                NotifyLevel::Warning,
                format!(
                    "{}: {}",
                    outcome.filename().unwrap_or("file"),
                    message.as_deref().unwrap_or("conversion failed")
                ),
            );
        }
    }
}
