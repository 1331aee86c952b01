use docgenie_core::WorkspaceError;
use docgenie_core::api::ApiClient;
use docgenie_core::upload::{self, UploadBatch, UploadOptions};
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;
use crate::events::{UiEvent, UploadUiEvent};
use crate::runtime::inbox::UiEventSender;

/// Runs the whole upload pipeline for one batch.
///
/// Steps are strictly sequential: submit (streaming progress events to the
/// inbox), refresh the session list, then load the session the batch
/// resolved to. Cancelling `cancel` abandons whichever step is running.
pub async fn upload_pipeline(
    api: ApiClient,
    batch: UploadBatch,
    options: UploadOptions,
    task: TaskId,
    inbox: UiEventSender,
    cancel: CancellationToken,
) -> UiEvent {
    let pipeline = async {
        let result = upload::submit(
            &api,
            batch,
            options,
            move |progress| {
                let _ = inbox.send(UiEvent::Upload(UploadUiEvent::Progress { task, progress }));
            },
            cancel.child_token(),
        )
        .await?;

        let sessions = api.list_sessions().await?;
        let detail = api.get_session(&result.session_id).await?;
        Ok::<_, WorkspaceError>(UploadUiEvent::Completed {
            outcomes: result.outcomes,
            sessions,
            detail,
        })
    };

    let event = tokio::select! {
        () = cancel.cancelled() => UploadUiEvent::Failed {
            error: WorkspaceError::Cancelled,
        },
        result = pipeline => result.unwrap_or_else(|error| UploadUiEvent::Failed { error }),
    };
    UiEvent::Upload(event)
}
