//! CLI command handlers.
//!
//! Commands that change what the workspace shows (listing, loading,
//! uploading, chatting, deleting) drive a [`WorkspaceRuntime`] the same way
//! an interactive surface would, then print the settled state. One-shot
//! reads (export, original file URL) talk to the API client directly.

pub mod chat;
pub mod config;
pub mod export;
pub mod open;
pub mod sessions;
pub mod upload;

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use docgenie_core::config::Config;
use docgenie_workspace::{NotifyLevel, WorkspaceRuntime};

pub(crate) fn workspace(config: &Config) -> Result<WorkspaceRuntime> {
    WorkspaceRuntime::new(config)
}

/// Waits for every spawned handler, then reports queued notifications.
///
/// Non-error notifications go to stderr. The first error becomes the
/// command's error.
pub(crate) async fn settle(runtime: &mut WorkspaceRuntime) -> Result<()> {
    runtime.run_until_idle().await;
    report(runtime)
}

pub(crate) fn report(runtime: &mut WorkspaceRuntime) -> Result<()> {
    let mut first_error = None;
    for note in runtime.state.take_notifications() {
        match note.level {
            NotifyLevel::Error => {
                if first_error.is_none() {
                    first_error = Some(note.message);
                } else {
                    eprintln!("error: {}", note.message);
                }
            }
            NotifyLevel::Warning => eprintln!("warning: {}", note.message),
            NotifyLevel::Info | NotifyLevel::Success => eprintln!("{}", note.message),
        }
    }
    if let Some(message) = first_error {
        bail!(message);
    }
    Ok(())
}

/// Formats a server timestamp for listings; unparseable values pass through.
pub(crate) fn format_created(created_at: Option<&str>) -> String {
    let Some(raw) = created_at else {
        return "unknown".to_string();
    };
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
