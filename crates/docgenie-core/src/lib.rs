//! Core DocGenie library (API client, upload pipeline, pane layout, config).

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod logging;
pub mod markdown;
pub mod upload;

pub use error::WorkspaceError;
