//! Batch upload: client-side validation, multipart submission with byte-level
//! progress, and resolution of the server's per-file results.
//!
//! ## Phases
//!
//! ```text
//! submit ──► Percent(0) … Percent(100) ──► Transmitted ──► (server converts) ──► result
//! ```
//!
//! `Transmitted` fires once every byte has been handed to the transport. The
//! server may keep converting for much longer than the transfer took, so
//! callers surface it as a distinct "processing" phase.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use anyhow::{Context, Result};
use bytes::Bytes;
use futures_util::stream;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, FileOutcome};
use crate::config::UploadConfig;
use crate::error::WorkspaceError;

/// Extensions accepted by the converter (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "pptx", "html", "htm", "png", "jpg", "jpeg"];

/// Size of the body chunks handed to the transport; progress granularity.
const CHUNK_SIZE: usize = 64 * 1024;

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Reads a file from disk, naming it after its final path component.
    pub async fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("'{}' has no file name", path.display()))?;
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(name, data))
    }

    /// Lowercased final dot-segment of the name, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    pub fn is_supported(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("pdf") => "application/pdf",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("pptx") => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Some("html" | "htm") => "text/html",
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }
}

/// Conversion options sent alongside the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    pub ocr_enabled: bool,
    pub table_extraction: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        UploadConfig::default().into()
    }
}

impl From<UploadConfig> for UploadOptions {
    fn from(config: UploadConfig) -> Self {
        Self {
            ocr_enabled: config.ocr_enabled,
            table_extraction: config.table_extraction,
        }
    }
}

/// A validated, non-empty set of supported files.
///
/// Only [`validate`] constructs one, so holding an `UploadBatch` proves the
/// allow-list check already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    files: Vec<SelectedFile>,
}

impl UploadBatch {
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.data.len() as u64).sum()
    }
}

/// Filters `files` down to the allow-list, preserving order.
pub fn validate(files: Vec<SelectedFile>) -> Result<UploadBatch, WorkspaceError> {
    let dropped = files.len();
    let files: Vec<SelectedFile> = files.into_iter().filter(SelectedFile::is_supported).collect();
    if files.is_empty() {
        return Err(WorkspaceError::NoSupportedFiles);
    }
    if files.len() < dropped {
        tracing::debug!(
            skipped = dropped - files.len(),
            "ignoring files with unsupported extensions"
        );
    }
    Ok(UploadBatch { files })
}

/// Progress signal emitted while a batch is being transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadProgress {
    /// Percentage of bytes handed to the transport (0–100, non-decreasing).
    Percent(u8),
    /// All bytes sent; the server is now converting.
    Transmitted,
}

/// Successful batch: the session to open plus every per-file outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub session_id: String,
    pub outcomes: Vec<FileOutcome>,
}

/// Applies the batch policy: the batch succeeds or fails with its last entry.
///
/// `[success(A), error(B)]` fails with B's message even though A converted;
/// `[error(A), success(B)]` succeeds with B.
pub fn resolve_batch(outcomes: &[FileOutcome]) -> Result<String, WorkspaceError> {
    match outcomes.last() {
        None => Err(WorkspaceError::EmptyResultSet),
        Some(FileOutcome::Error { message, .. }) => Err(WorkspaceError::BatchPartialFailure {
            message: message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
        Some(FileOutcome::Success { session_id, .. }) => Ok(session_id.clone()),
    }
}

type ProgressSink = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Counts bytes as the transport pulls body chunks.
struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last_percent: AtomicU8,
    transmitted: AtomicBool,
    sink: ProgressSink,
}

impl ProgressTracker {
    fn new(total: u64, sink: ProgressSink) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            last_percent: AtomicU8::new(0),
            transmitted: AtomicBool::new(false),
            sink,
        }
    }

    fn start(&self) {
        if self.total == 0 {
            // Length unknown: no percentages, only the phase change.
            self.mark_transmitted();
        } else {
            (self.sink)(UploadProgress::Percent(0));
        }
    }

    fn record(&self, bytes: usize) {
        if self.total == 0 {
            return;
        }
        let sent = self.sent.fetch_add(bytes as u64, Ordering::SeqCst) + bytes as u64;
        let sent = sent.min(self.total);
        // Rounded like the browser's Math.round(loaded / total * 100).
        let percent = ((sent * 200 + self.total) / (self.total * 2)).min(100) as u8;
        let previous = self.last_percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            (self.sink)(UploadProgress::Percent(percent));
        }
        if sent >= self.total {
            self.mark_transmitted();
        }
    }

    fn mark_transmitted(&self) {
        if !self.transmitted.swap(true, Ordering::SeqCst) {
            (self.sink)(UploadProgress::Transmitted);
        }
    }
}

/// Uploads `batch` to `POST /convert/batch` and resolves it to a session id.
///
/// `on_progress` is called from the transport's task. Cancelling `cancel`
/// drops the in-flight request and resolves to [`WorkspaceError::Cancelled`].
pub async fn submit<F>(
    api: &ApiClient,
    batch: UploadBatch,
    options: UploadOptions,
    on_progress: F,
    cancel: CancellationToken,
) -> Result<BatchResult, WorkspaceError>
where
    F: Fn(UploadProgress) + Send + Sync + 'static,
{
    let tracker = Arc::new(ProgressTracker::new(
        batch.total_bytes(),
        Arc::new(on_progress),
    ));

    let mut form = reqwest::multipart::Form::new();
    for file in batch.files {
        let mime = file.mime_type();
        let length = file.data.len() as u64;
        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(chunked_body(file.data, Arc::clone(&tracker))),
            length,
        )
        .file_name(file.name)
        .mime_str(mime)?;
        form = form.part("files", part);
    }
    let form = form
        .text("ocr_enabled", options.ocr_enabled.to_string())
        .text("table_extraction", options.table_extraction.to_string());

    tracker.start();

    let outcomes = tokio::select! {
        () = cancel.cancelled() => {
            tracing::info!("upload cancelled");
            return Err(WorkspaceError::Cancelled);
        }
        result = api.convert_batch(form) => result?,
    };
    // Some transports finish without pulling an empty trailing chunk.
    tracker.mark_transmitted();

    let session_id = resolve_batch(&outcomes)?;
    tracing::info!(%session_id, files = outcomes.len(), "batch converted");
    Ok(BatchResult {
        session_id,
        outcomes,
    })
}

fn chunked_body(
    data: Bytes,
    tracker: Arc<ProgressTracker>,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();
    stream::iter(chunks.into_iter().map(move |chunk| {
        tracker.record(chunk.len());
        Ok(chunk)
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn success(id: &str) -> FileOutcome {
        FileOutcome::Success {
            session_id: id.to_string(),
            filename: None,
        }
    }

    fn failure(message: &str) -> FileOutcome {
        FileOutcome::Error {
            message: Some(message.to_string()),
            filename: None,
        }
    }

    #[test]
    fn validate_filters_case_insensitively_on_last_segment() {
        let batch = validate(vec![
            SelectedFile::new("Report.PDF", "a"),
            SelectedFile::new("notes.txt", "b"),
            SelectedFile::new("archive.pdf.zip", "c"),
            SelectedFile::new("photo.final.JPeG", "d"),
            SelectedFile::new("pdf", "e"),
        ])
        .unwrap();

        let names: Vec<_> = batch.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Report.PDF", "photo.final.JPeG"]);
    }

    #[test]
    fn validate_rejects_batches_without_supported_files() {
        let err = validate(vec![SelectedFile::new("a.exe", "x")]).unwrap_err();
        assert_eq!(err, WorkspaceError::NoSupportedFiles);
        assert_eq!(validate(Vec::new()).unwrap_err(), WorkspaceError::NoSupportedFiles);
    }

    #[test]
    fn batch_fails_when_last_entry_failed_even_if_earlier_succeeded() {
        let err = resolve_batch(&[success("A"), failure("B broke")]).unwrap_err();
        assert_eq!(
            err,
            WorkspaceError::BatchPartialFailure {
                message: "B broke".to_string()
            }
        );
    }

    #[test]
    fn batch_succeeds_with_last_entry_even_if_earlier_failed() {
        assert_eq!(resolve_batch(&[failure("A broke"), success("B")]).unwrap(), "B");
        assert_eq!(resolve_batch(&[success("A"), success("B")]).unwrap(), "B");
    }

    #[test]
    fn empty_results_are_an_error() {
        assert_eq!(resolve_batch(&[]).unwrap_err(), WorkspaceError::EmptyResultSet);
    }

    #[test]
    fn tracker_reports_monotonic_percentages_then_transmitted_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let tracker = ProgressTracker::new(
            200,
            Arc::new(move |p| sink_seen.lock().unwrap().push(p)),
        );

        tracker.start();
        tracker.record(50);
        tracker.record(0);
        tracker.record(50);
        tracker.record(100);
        tracker.mark_transmitted();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                UploadProgress::Percent(0),
                UploadProgress::Percent(25),
                UploadProgress::Percent(50),
                UploadProgress::Percent(100),
                UploadProgress::Transmitted,
            ]
        );
    }

    #[test]
    fn tracker_without_length_reports_no_percentages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let tracker =
            ProgressTracker::new(0, Arc::new(move |p| sink_seen.lock().unwrap().push(p)));

        tracker.start();
        tracker.record(10);

        assert_eq!(*seen.lock().unwrap(), vec![UploadProgress::Transmitted]);
    }

    #[tokio::test]
    async fn submit_reports_progress_and_resolves_last_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"status": "error", "error": "bad scan", "filename": "a.png"},
                    {"status": "success", "session_id": "s2", "filename": "report.pdf"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let batch = validate(vec![
            SelectedFile::new("a.png", vec![0_u8; 100_000]),
            SelectedFile::new("report.pdf", vec![1_u8; 30_000]),
        ])
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let result = submit(
            &api,
            batch,
            UploadOptions::default(),
            move |p| sink_seen.lock().unwrap().push(p),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.session_id, "s2");
        assert_eq!(result.outcomes.len(), 2);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&UploadProgress::Percent(0)));
        assert_eq!(seen.last(), Some(&UploadProgress::Transmitted));
        let percents: Vec<u8> = seen
            .iter()
            .filter_map(|p| match p {
                UploadProgress::Percent(v) => Some(*v),
                UploadProgress::Transmitted => None,
            })
            .collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[tokio::test]
    async fn submit_maps_http_failure_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert/batch"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let batch = validate(vec![SelectedFile::new("a.pdf", "x")]).unwrap();
        let err = submit(&api, batch, UploadOptions::default(), |_| {}, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkspaceError::Transport {
                status: Some(413),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn cancelled_submit_resolves_to_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/convert/batch"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"results": []}))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let batch = validate(vec![SelectedFile::new("a.pdf", "x")]).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = submit(&api, batch, UploadOptions::default(), |_| {}, cancel)
            .await
            .unwrap_err();
        assert_eq!(err, WorkspaceError::Cancelled);
    }
}
