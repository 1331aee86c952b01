//! Original-file command handler.

use anyhow::{Context, Result, bail};
use docgenie_core::api::ApiClient;
use docgenie_core::config::Config;

pub async fn run(config: &Config, id: &str, launch: bool) -> Result<()> {
    let api = ApiClient::from_config(config)?;
    let detail = api
        .get_session(id)
        .await
        .with_context(|| format!("load session '{id}'"))?;
    let Some(url) = api.original_file_url(&detail.session) else {
        bail!("No file available to view. File might be local only.");
    };

    println!("{url}");
    if launch {
        open::that(url.as_str()).with_context(|| format!("open {url}"))?;
    }
    Ok(())
}
