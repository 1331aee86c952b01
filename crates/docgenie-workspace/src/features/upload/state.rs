use docgenie_core::api::Session;
use docgenie_core::upload::UploadOptions;

use crate::state::ViewState;

/// The view that was showing when files were dropped, restored if the
/// upload fails or is cancelled.
#[derive(Debug, Clone)]
pub struct ParkedView {
    pub session: Option<Session>,
    pub view_state: ViewState,
}

/// The upload slice. Holds at most one batch; nothing here outlives it.
#[derive(Debug, Clone)]
pub struct UploadState {
    options: UploadOptions,
    progress: Option<u8>,
    file_count: usize,
    parked: Option<ParkedView>,
}

impl UploadState {
    pub fn new(options: UploadOptions) -> Self {
        Self {
            options,
            progress: None,
            file_count: 0,
            parked: None,
        }
    }

    pub fn options(&self) -> UploadOptions {
        self.options
    }

    pub fn set_options(&mut self, options: UploadOptions) {
        self.options = options;
    }

    /// Last reported transfer percentage; `None` until the transport reports one.
    pub fn progress(&self) -> Option<u8> {
        self.progress
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn parked(&self) -> Option<&ParkedView> {
        self.parked.as_ref()
    }

    pub fn begin(&mut self, parked: ParkedView, file_count: usize) {
        self.progress = None;
        self.file_count = file_count;
        self.parked = Some(parked);
    }

    /// Records a percentage. Never moves backwards.
    pub fn record_progress(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.progress = Some(self.progress.map_or(percent, |p| p.max(percent)));
    }

    /// Discards the batch, handing back the parked view.
    pub fn finish(&mut self) -> Option<ParkedView> {
        self.progress = None;
        self.file_count = 0;
        self.parked.take()
    }

    /// Drops a parked session that no longer exists server-side.
    pub fn forget_parked_session(&mut self, session_id: &str) {
        if let Some(parked) = &mut self.parked
            && parked.session.as_ref().is_some_and(|s| s.id == session_id)
        {
            parked.session = None;
            if parked.view_state == ViewState::Loaded {
                parked.view_state = ViewState::Idle;
            }
        }
    }
}
