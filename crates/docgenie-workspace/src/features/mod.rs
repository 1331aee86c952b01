//! Feature slices for the workspace (state/update per slice).

pub mod chat;
pub mod layout;
pub mod sessions;
pub mod upload;
