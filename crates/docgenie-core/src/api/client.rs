//! HTTP client for the DocGenie server.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{
    BatchResponse, ChatResponse, FallbackChatRequest, FileOutcome, Session, SessionChatRequest,
    SessionDetail, SessionListResponse, SessionSummary,
};
use crate::config::Config;
use crate::error::WorkspaceError;

/// Client for the session, chat and conversion endpoints.
///
/// Cheap to clone: both inner `reqwest::Client`s are reference counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    /// Uploads are bounded only by cancellation; conversion can take minutes.
    upload_http: reqwest::Client,
}

impl ApiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.server.base_url, config.request_timeout())
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid server URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("Server URL '{base_url}' cannot be used as a base URL");
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let upload_http = reqwest::Client::builder()
            .build()
            .context("Failed to build upload HTTP client")?;

        Ok(Self {
            base_url,
            http,
            upload_http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL under the base path, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Absolute URL of the stored original for `session`, if any.
    pub fn original_file_url(&self, session: &Session) -> Option<Url> {
        session.original_file_url(&self.base_url)
    }

    /// `GET /sessions`
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, WorkspaceError> {
        let url = self.endpoint(&["sessions"]);
        tracing::debug!(%url, "listing sessions");
        let response = self.http.get(url).send().await?;
        let body: SessionListResponse = decode(check_status(response).await?).await?;
        Ok(body.sessions)
    }

    /// `GET /sessions/{id}`
    pub async fn get_session(&self, id: &str) -> Result<SessionDetail, WorkspaceError> {
        let url = self.endpoint(&["sessions", id]);
        tracing::debug!(%url, "loading session");
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WorkspaceError::SessionNotFound { id: id.to_string() });
        }
        decode(check_status(response).await?).await
    }

    /// `DELETE /sessions/{id}`
    pub async fn delete_session(&self, id: &str) -> Result<(), WorkspaceError> {
        let url = self.endpoint(&["sessions", id]);
        tracing::debug!(%url, "deleting session");
        let response = self.http.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WorkspaceError::SessionNotFound { id: id.to_string() });
        }
        check_status(response).await?;
        Ok(())
    }

    /// `POST /sessions/{id}/chat`
    pub async fn session_chat(&self, id: &str, query: &str) -> Result<String, WorkspaceError> {
        let url = self.endpoint(&["sessions", id, "chat"]);
        let response = self
            .http
            .post(url)
            .json(&SessionChatRequest { query })
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(WorkspaceError::SessionNotFound { id: id.to_string() });
        }
        let body: ChatResponse = decode(check_status(response).await?).await?;
        Ok(body.response)
    }

    /// `POST /chat`, used when no session is active.
    pub async fn fallback_chat(&self, query: &str) -> Result<String, WorkspaceError> {
        let url = self.endpoint(&["chat"]);
        let response = self
            .http
            .post(url)
            .json(&FallbackChatRequest {
                query,
                local_file_path: None,
            })
            .send()
            .await?;
        let body: ChatResponse = decode(check_status(response).await?).await?;
        Ok(body.response)
    }

    /// `POST /convert/batch` with a prepared multipart form.
    pub(crate) async fn convert_batch(
        &self,
        form: reqwest::multipart::Form,
    ) -> Result<Vec<FileOutcome>, WorkspaceError> {
        let url = self.endpoint(&["convert", "batch"]);
        tracing::info!(%url, "submitting batch");
        let response = self.upload_http.post(url).multipart(form).send().await?;
        let body: BatchResponse = decode(check_status(response).await?).await?;
        Ok(body.results)
    }
}

/// Maps non-2xx responses to `Transport`, preferring FastAPI's `detail` field.
async fn check_status(response: Response) -> Result<Response, WorkspaceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        });
    tracing::warn!(status = status.as_u16(), %reason, "server returned an error");
    Err(WorkspaceError::transport(Some(status.as_u16()), reason))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, WorkspaceError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WorkspaceError::Parse(e.to_string()))
}
