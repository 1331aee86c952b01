//! Render adapter: turns `AppState` into a display-ready view model.
//!
//! Nothing here mutates state. A display surface (browser bridge, terminal,
//! test) calls [`view`] after each batch of events and draws the result.

use docgenie_core::api::Role;
use docgenie_core::layout::Divider;
use docgenie_core::markdown::{Heading, escape_html, extract_headings, render_markdown};
use regex::RegexBuilder;

use crate::state::{AppState, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceView {
    pub view_state: ViewState,
    pub drop_zone_visible: bool,
    pub progress: Option<ProgressView>,
    pub sidebar: Vec<SidebarItem>,
    pub document: Option<DocumentView>,
    pub transcript: Vec<TranscriptEntry>,
    pub chat_pending: bool,
    pub panes: PaneWidths,
    pub resizing: Option<Divider>,
    pub cursor: Option<&'static str>,
    pub text_selection_suppressed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// `None` while processing, or when the transport reports no length.
    pub percent: Option<u8>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarItem {
    pub id: String,
    pub filename: String,
    /// Filename with filter matches wrapped in `<mark>`, HTML-escaped.
    pub label_html: String,
    pub created_at: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub title: String,
    pub html: String,
    pub structure: Vec<Heading>,
    pub original_file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneWidths {
    pub structure: f64,
    pub output: f64,
    pub chat: f64,
    /// Drag floor, for the panes' `min-width`.
    pub min: f64,
}

pub fn view(app: &AppState) -> WorkspaceView {
    let layout = app.layout.layout();
    WorkspaceView {
        view_state: app.view.view_state,
        drop_zone_visible: app.view.current_session.is_none() && !app.upload_in_flight(),
        progress: progress(app),
        sidebar: sidebar(app),
        document: app.view.current_session.as_ref().map(|session| DocumentView {
            title: session.filename.clone(),
            html: render_markdown(&session.markdown_content),
            structure: extract_headings(&session.markdown_content),
            original_file_url: app.original_file_url(),
        }),
        transcript: app
            .chat
            .transcript()
            .iter()
            .map(|message| TranscriptEntry {
                role: message.role,
                html: match message.role {
                    Role::Ai => render_markdown(&message.content),
                    Role::User | Role::System => escape_html(&message.content),
                },
            })
            .collect(),
        chat_pending: app.chat.pending() > 0,
        panes: PaneWidths {
            structure: layout.structure_pct(),
            output: layout.output_pct(),
            chat: layout.chat_pct(),
            min: layout.min_pct(),
        },
        resizing: app.layout.resizing_divider(),
        cursor: app.layout.cursor(),
        text_selection_suppressed: app.layout.text_selection_suppressed(),
    }
}

fn progress(app: &AppState) -> Option<ProgressView> {
    match app.view.view_state {
        ViewState::Uploading => {
            let percent = app.upload.progress();
            let label = match percent {
                Some(p) => format!("Uploading... {p}%"),
                None => "Uploading...".to_string(),
            };
            Some(ProgressView { percent, label })
        }
        ViewState::Processing => Some(ProgressView {
            percent: None,
            label: format!(
                "Processing {} file(s)... this may take a while",
                app.upload.file_count()
            ),
        }),
        ViewState::Idle | ViewState::Loaded | ViewState::Error => None,
    }
}

fn sidebar(app: &AppState) -> Vec<SidebarItem> {
    let query = app.sessions.filter_query();
    app.sessions
        .visible()
        .into_iter()
        .map(|s| SidebarItem {
            id: s.id.clone(),
            filename: s.filename.clone(),
            label_html: highlight(&s.filename, query),
            created_at: s.created_at.clone(),
            active: app.sessions.active_id() == Some(s.id.as_str()),
        })
        .collect()
}

/// Escapes `text` and wraps case-insensitive occurrences of `query` in `<mark>`.
pub fn highlight(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return escape_html(text);
    }
    let Ok(re) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return escape_html(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}
