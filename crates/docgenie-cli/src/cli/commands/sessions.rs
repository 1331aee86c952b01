//! Session list, detail and delete handlers.

use anyhow::{Result, bail};
use docgenie_core::api::Role;
use docgenie_core::config::Config;
use docgenie_workspace::events::UiEvent;
use docgenie_workspace::render;

use super::{format_created, settle, workspace};

pub async fn list(config: &Config, filter: Option<String>) -> Result<()> {
    let mut runtime = workspace(config)?;
    runtime.start();
    settle(&mut runtime).await?;

    if let Some(query) = filter {
        runtime.dispatch(UiEvent::FilterSessions { query });
    }

    let visible = runtime.state.sessions.visible();
    if visible.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }
    for session in visible {
        println!(
            "{}  {}  {}",
            session.filename,
            session.id,
            format_created(session.created_at.as_deref())
        );
    }
    Ok(())
}

pub async fn show(config: &Config, id: String) -> Result<()> {
    let mut runtime = workspace(config)?;
    runtime.dispatch(UiEvent::PickSession {
        session_id: id.clone(),
    });
    settle(&mut runtime).await?;

    let view = render::view(&runtime.state);
    let (Some(document), Some(session)) = (view.document, &runtime.state.view.current_session)
    else {
        bail!("Session '{id}' could not be loaded");
    };

    println!("{}  ({})", document.title, session.id);
    if !document.structure.is_empty() {
        println!();
        println!("Structure:");
        for heading in &document.structure {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            println!("{indent}- {}", heading.text);
        }
    }
    println!();
    println!("{}", session.markdown_content);

    let transcript = runtime.state.chat.transcript();
    if !transcript.is_empty() {
        println!();
        println!("Chat:");
        for message in transcript {
            let who = match message.role {
                Role::User => "you",
                Role::Ai => "ai",
                Role::System => "system",
            };
            println!("[{who}] {}", message.content);
        }
    }
    Ok(())
}

pub async fn delete(config: &Config, id: String) -> Result<()> {
    let mut runtime = workspace(config)?;
    runtime.dispatch(UiEvent::DeleteSession {
        session_id: id.clone(),
    });
    settle(&mut runtime).await?;
    println!("Deleted session {id}");
    Ok(())
}
