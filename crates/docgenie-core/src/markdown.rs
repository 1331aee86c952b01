//! Markdown rendering and outline extraction for the output and structure panes.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,3}) (.+)$").expect("valid heading regex"));

/// An outline entry for the structure pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Matches the `id` given to the rendered heading element.
    pub anchor: String,
}

pub fn anchor_for(index: usize) -> String {
    format!("heading-{index}")
}

/// Renders markdown to an HTML fragment.
///
/// Level 1–3 headings get `id="heading-N"` in document order, so outline
/// entries from [`extract_headings`] can link to them.
pub fn render_markdown(text: &str) -> String {
    let mut index = 0;
    let events = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id: _,
                classes,
                attrs,
            }) if level <= HeadingLevel::H3 => {
                let id = CowStr::from(anchor_for(index));
                index += 1;
                Event::Start(Tag::Heading {
                    level,
                    id: Some(id),
                    classes,
                    attrs,
                })
            }
            other => other,
        });

    let mut html = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    html
}

/// Escapes text for inclusion in HTML, including both quote characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a `String` cannot fail.
    let _ = pulldown_cmark_escape::escape_html(&mut out, text);
    out
}

/// Scans raw markdown for `#`, `##` and `###` lines.
///
/// This is a line scan, not a parse: a heading-looking line inside a fenced
/// code block is still reported.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    HEADING_LINE
        .captures_iter(markdown)
        .enumerate()
        .map(|(index, caps)| Heading {
            level: caps[1].len() as u8,
            text: caps[2].trim_end_matches('\r').to_string(),
            anchor: anchor_for(index),
        })
        .collect()
}
