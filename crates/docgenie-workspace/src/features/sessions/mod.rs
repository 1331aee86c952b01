//! Session list, filtering and loading.

mod state;
mod update;

pub use state::SessionsState;
pub use update::{handle_delete, handle_event, handle_filter, handle_pick, handle_refresh};
