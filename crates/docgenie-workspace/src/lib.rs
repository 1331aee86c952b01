//! DocGenie workspace controller.
//!
//! A pure state/transition layer (`state`, `events`, `update`, `effects`)
//! plus a runtime that executes effects against the server and a render
//! adapter that turns state into a view model. Nothing here depends on a
//! particular display surface.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod update;

pub use features::{chat, layout, sessions, upload};
pub use runtime::WorkspaceRuntime;
pub use state::{AppState, Notification, NotifyLevel, ViewState};
