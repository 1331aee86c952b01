//! DocGenie server API: typed client and wire types.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{ChatMessage, FileOutcome, Role, Session, SessionDetail, SessionSummary};
