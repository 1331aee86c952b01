//! Upload command: drop files into a fresh workspace and wait for the result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use docgenie_core::config::Config;
use docgenie_core::upload::SelectedFile;
use docgenie_workspace::events::UiEvent;
use docgenie_workspace::{AppState, ViewState};

use super::{settle, workspace};

pub async fn run(config: &Config, paths: &[PathBuf], ocr: bool, no_tables: bool) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(SelectedFile::read(path).await?);
    }

    let mut runtime = workspace(config)?;
    let mut options = runtime.state.upload.options();
    if ocr {
        options.ocr_enabled = true;
    }
    if no_tables {
        options.table_extraction = false;
    }
    runtime.dispatch(UiEvent::SetUploadOptions(options));
    runtime.dispatch(UiEvent::DropFiles { files });

    if runtime.state.upload_in_flight() {
        let mut printer = ProgressPrinter::default();
        printer.observe(&runtime.state);
        runtime
            .run_until_idle_with(|state| printer.observe(state))
            .await;
        printer.finish();
    }
    settle(&mut runtime).await?;

    let Some(session) = runtime.state.view.current_session.as_ref() else {
        bail!("Nothing was uploaded");
    };
    println!("Converted {} (session {})", session.filename, session.id);
    Ok(())
}

/// Writes upload progress to stderr, one update per change.
#[derive(Default)]
struct ProgressPrinter {
    last: Option<(ViewState, Option<u8>)>,
}

impl ProgressPrinter {
    fn observe(&mut self, state: &AppState) {
        let current = (state.view.view_state, state.upload.progress());
        if self.last == Some(current) {
            return;
        }
        self.last = Some(current);

        let mut stderr = std::io::stderr();
        let _ = match current {
            (ViewState::Uploading, Some(percent)) => write!(stderr, "\rUploading... {percent:>3}%"),
            (ViewState::Uploading, None) => write!(stderr, "\rUploading..."),
            (ViewState::Processing, _) => write!(
                stderr,
                "\nProcessing {} file(s)... this may take a while",
                state.upload.file_count()
            ),
            _ => return,
        };
        let _ = stderr.flush();
    }

    fn finish(&self) {
        if self.last.is_some() {
            eprintln!();
        }
    }
}
