//! Effect handlers.
//!
//! Pure async functions that perform I/O and return a `UiEvent`; the runtime
//! spawns them and routes the result back through the inbox.

pub mod chat;
pub mod sessions;
pub mod upload;
