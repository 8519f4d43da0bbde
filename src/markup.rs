//! Rich text markup primitives understood by the chat renderer.
//!
//! Every builder returns a plain `String`; markup is composed by
//! concatenating the results. Values placed inside attribute positions
//! (`value="..."`) are escaped here, content positions are embedded as
//! given and must be escaped by the caller when they come from user text.

use std::fmt;

/// Target of a mention link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MentionKind {
    Manager,
    Team,
}

impl MentionKind {
    /// Returns the `type` attribute value used in mention links.
    pub fn as_str(self) -> &'static str {
        match self {
            MentionKind::Manager => "manager",
            MentionKind::Team => "team",
        }
    }
}

impl fmt::Display for MentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders emoji shortcode, e.g. `:man_bowing:`.
pub fn emoji(name: &str) -> String {
    format!(":{}:", name)
}

/// Renders mention link pointing at a manager or team.
///
/// The identifier is escaped; the display name is embedded as markup
/// content and may itself contain formatting.
pub fn mention(kind: MentionKind, id: &str, display_name: &str) -> String {
    format!(
        "<link type=\"{}\" value=\"{}\">{}</link>",
        kind,
        escaped_string(id),
        display_name
    )
}

/// Wraps content in bold tags.
pub fn bold(s: &str) -> String {
    format!("<b>{}</b>", s)
}

/// Wraps content in italic tags.
pub fn italic(s: &str) -> String {
    format!("<i>{}</i>", s)
}

/// Renders URL link with the given content as link text.
pub fn inline_link(href: &str, s: &str) -> String {
    format!(
        "<link type=\"url\" value=\"{}\">{}</link>",
        escaped_string(href),
        s
    )
}

/// Renders variable placeholder, with fallback text when `alt` is non-empty.
pub fn variable(key: &str, alt: &str) -> String {
    if alt.is_empty() {
        format!("${{{}}}", key)
    } else {
        format!("${{{}|{}}}", key, alt)
    }
}

/// Escapes the four characters that collide with markup syntax.
///
/// Replaces `"`, `&`, `<` and `>` with their entity forms. Every other
/// character, including non-ASCII text, is copied unchanged. Applying it
/// twice double escapes.
pub fn escaped_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
