//! Export command handler.

use std::path::Path;

use anyhow::{Context, Result};
use docgenie_core::api::ApiClient;
use docgenie_core::config::Config;
use docgenie_core::export::{self, ExportFormat};

pub async fn run(config: &Config, id: &str, format: ExportFormat, out: Option<&Path>) -> Result<()> {
    let api = ApiClient::from_config(config)?;
    let detail = api
        .get_session(id)
        .await
        .with_context(|| format!("load session '{id}'"))?;
    let file = export::export(&detail.session, format);
    tracing::info!(session_id = id, %format, filename = %file.filename, "exporting");

    let Some(out) = out else {
        print!("{}", file.content);
        return Ok(());
    };

    let target = if out.is_dir() {
        out.join(&file.filename)
    } else {
        out.to_path_buf()
    };
    tokio::fs::write(&target, file.content.as_bytes())
        .await
        .with_context(|| format!("write {}", target.display()))?;
    println!("Wrote {}", target.display());
    Ok(())
}
