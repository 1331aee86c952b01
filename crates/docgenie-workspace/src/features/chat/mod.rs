//! Chat transcript and message exchange.

mod state;
mod update;

pub use state::{ChatState, PLACEHOLDER};
pub use update::{handle_event, handle_send};
