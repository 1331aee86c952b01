//! Wire types for the DocGenie server.

use serde::{Deserialize, Serialize};
use url::Url;

/// One entry of `GET /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A converted document as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub markdown_content: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Session {
    /// Link to the stored original under `base_url`, if the server kept one.
    ///
    /// The filename is pushed as a single path segment, so spaces, `#` and
    /// `?` are percent-encoded rather than starting a fragment or query.
    pub fn original_file_url(&self, base_url: &Url) -> Option<Url> {
        self.file_path.as_ref()?;
        let mut url = base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["static", "uploads", self.filename.as_str()]);
        Some(url)
    }
}

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
    System,
}

/// One transcript entry. Markdown for `Ai`, plain text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Response of `GET /sessions/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetail {
    pub session: Session,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Per-file outcome of `POST /convert/batch`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Success {
        session_id: String,
        #[serde(default)]
        filename: Option<String>,
    },
    Error {
        #[serde(default, rename = "error")]
        message: Option<String>,
        #[serde(default)]
        filename: Option<String>,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> Option<&str> {
        match self {
            FileOutcome::Success { filename, .. } | FileOutcome::Error { filename, .. } => {
                filename.as_deref()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponse {
    pub results: Vec<FileOutcome>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionChatRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FallbackChatRequest<'a> {
    pub query: &'a str,
    pub local_file_path: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_outcomes_parse_both_tags() {
        let body = serde_json::json!({
            "results": [
                {"status": "success", "session_id": "s1", "filename": "a.pdf", "markdown": "# A"},
                {"status": "error", "error": "Unsupported", "filename": "b.pdf"}
            ]
        });
        let parsed: BatchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            parsed.results,
            vec![
                FileOutcome::Success {
                    session_id: "s1".to_string(),
                    filename: Some("a.pdf".to_string()),
                },
                FileOutcome::Error {
                    message: Some("Unsupported".to_string()),
                    filename: Some("b.pdf".to_string()),
                },
            ]
        );
    }

    #[test]
    fn detail_tolerates_extra_columns_and_null_file_path() {
        let body = serde_json::json!({
            "session": {
                "id": "s1",
                "filename": "report.pdf",
                "markdown_content": "# Title\nBody",
                "file_path": null,
                "created_at": "2025-01-02T03:04:05"
            },
            "messages": [
                {"id": "m1", "session_id": "s1", "role": "user", "content": "hi", "created_at": "x"},
                {"id": "m2", "session_id": "s1", "role": "ai", "content": "**hello**", "created_at": "y"}
            ]
        });
        let detail: SessionDetail = serde_json::from_value(body).unwrap();
        assert_eq!(detail.session.file_path, None);
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(detail.session.original_file_url(&base), None);
        assert_eq!(detail.messages[1], ChatMessage::ai("**hello**"));
    }

    fn stored(filename: &str) -> Session {
        Session {
            id: "s1".to_string(),
            filename: filename.to_string(),
            markdown_content: String::new(),
            file_path: Some(format!("static/uploads/{filename}")),
            created_at: None,
        }
    }

    #[test]
    fn original_file_url_uses_uploads_dir() {
        let base = Url::parse("http://localhost:8000/docgenie/").unwrap();
        assert_eq!(
            stored("deck.pptx").original_file_url(&base).unwrap().as_str(),
            "http://localhost:8000/docgenie/static/uploads/deck.pptx"
        );
    }

    #[test]
    fn original_file_url_encodes_reserved_characters() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        let url = stored("Q3 #1 report?.pdf")
            .original_file_url(&base)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/static/uploads/Q3%20%231%20report%3F.pdf"
        );
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);
    }
}
