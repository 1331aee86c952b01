//! Downloadable renditions of a converted document.

use std::fmt;
use std::str::FromStr;

use crate::api::Session;
use crate::markdown::render_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Html => "html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Html => "html",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => Err(format!(
                "unknown export format '{other}' (expected markdown, json or html)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// Produces the download for `session` in `format`.
///
/// The file is named after the session's original file with the format's
/// extension appended (`report.pdf` becomes `report.pdf.md`).
pub fn export(session: &Session, format: ExportFormat) -> ExportedFile {
    let content = match format {
        ExportFormat::Markdown => session.markdown_content.clone(),
        ExportFormat::Json => {
            let value = serde_json::json!({ "markdown": session.markdown_content });
            // Serializing a `Value` built from a string cannot fail.
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        ExportFormat::Html => render_markdown(&session.markdown_content),
    };
    let stem = if session.filename.is_empty() {
        "document"
    } else {
        session.filename.as_str()
    };

    ExportedFile {
        filename: format!("{stem}.{}", format.extension()),
        mime_type: format.mime_type(),
        content,
    }
}
