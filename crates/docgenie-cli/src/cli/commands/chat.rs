//! Chat command handler.

use anyhow::{Result, bail};
use docgenie_core::api::Role;
use docgenie_core::config::Config;
use docgenie_workspace::events::UiEvent;

use super::{settle, workspace};

pub async fn run(config: &Config, session: Option<String>, query: String) -> Result<()> {
    if query.trim().is_empty() {
        bail!("Query must not be empty");
    }

    let mut runtime = workspace(config)?;
    if let Some(session_id) = session {
        runtime.dispatch(UiEvent::PickSession { session_id });
        settle(&mut runtime).await?;
    }

    runtime.dispatch(UiEvent::SendChat { text: query });
    settle(&mut runtime).await?;

    match runtime.state.chat.transcript().last() {
        Some(message) if message.role == Role::Ai => {
            println!("{}", message.content);
            Ok(())
        }
        _ => bail!("No response received"),
    }
}
