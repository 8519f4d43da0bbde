//! GitHub Flavored Markdown to message block conversion.

use anyhow::{Context, Result};
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue};
use comrak::{Arena, Options, parse_document};
use std::path::Path;

use super::mentions::substitute_mentions;
use super::references::reference_text;
use crate::block::MessageBlock;
use crate::manager::{ManagerDirectory, Managers};
use crate::markup::{bold, escaped_string, inline_link, italic};

/// Node kinds the converter distinguishes.
///
/// Everything not listed maps to `Other` and is rendered generically:
/// containers concatenate their children, leaves emit their literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    List { marker: char },
    ListItem { padding: usize },
    CodeBlock,
    HtmlBlock,
    Emphasis,
    Strong,
    Heading,
    AutoLink { url: String },
    Link { url: String },
    CodeSpan,
    Text,
    LineBreak,
    Other,
}

impl NodeKind {
    fn of<'a>(node: &'a AstNode<'a>, source: &str) -> Self {
        match &node.data.borrow().value {
            NodeValue::List(list) => NodeKind::List {
                marker: list_marker(list),
            },
            NodeValue::Item(item) => NodeKind::ListItem {
                padding: item.padding,
            },
            // Task items drop their own list metadata, the parent list keeps it
            NodeValue::TaskItem(..) => NodeKind::ListItem {
                padding: node
                    .parent()
                    .and_then(|parent| match &parent.data.borrow().value {
                        NodeValue::List(list) => Some(list.padding),
                        _ => None,
                    })
                    .unwrap_or(0),
            },
            NodeValue::CodeBlock(_) => NodeKind::CodeBlock,
            NodeValue::HtmlBlock(_) => NodeKind::HtmlBlock,
            NodeValue::Emph => NodeKind::Emphasis,
            NodeValue::Strong => NodeKind::Strong,
            NodeValue::Heading(_) => NodeKind::Heading,
            NodeValue::Link(link) => {
                let text = raw_text(node);
                if is_autolink(&link.url, &text) && !is_bracketed(node, source, &text) {
                    NodeKind::AutoLink {
                        url: link.url.clone(),
                    }
                } else {
                    NodeKind::Link {
                        url: link.url.clone(),
                    }
                }
            }
            NodeValue::Code(_) => NodeKind::CodeSpan,
            NodeValue::Text(_) => NodeKind::Text,
            NodeValue::SoftBreak | NodeValue::LineBreak => NodeKind::LineBreak,
            _ => NodeKind::Other,
        }
    }

    /// Whether node content is literal lines rather than nested structure.
    fn is_raw(&self) -> bool {
        matches!(self, NodeKind::CodeBlock | NodeKind::HtmlBlock)
    }
}

/// Returns the marker character written in front of nested list items.
fn list_marker(list: &NodeList) -> char {
    match list.list_type {
        ListType::Bullet => char::from(list.bullet_char),
        ListType::Ordered => match list.delimiter {
            ListDelimType::Period => '.',
            ListDelimType::Paren => ')',
        },
    }
}

/// Detects links the parser created from bare URLs.
///
/// comrak keeps autolinks as ordinary links whose text is the URL as
/// written. `www.` links gain an `http://` scheme and emails a `mailto:`
/// scheme in the destination only.
fn is_autolink(url: &str, text: &str) -> bool {
    url == text
        || url.strip_prefix("http://") == Some(text)
        || url.strip_prefix("mailto:") == Some(text)
}

/// Whether the link was written as `[text]` in the source.
///
/// An explicit link whose text equals its URL has the same AST shape as
/// an autolink; only the source at the node position tells them apart.
/// Nodes without a position count as not bracketed.
fn is_bracketed<'a>(node: &'a AstNode<'a>, source: &str, text: &str) -> bool {
    let start = node.data.borrow().sourcepos.start;
    if start.line == 0 || start.column == 0 {
        return false;
    }

    let bracketed = format!("[{}]", text);
    source
        .lines()
        .nth(start.line - 1)
        .and_then(|line| line.get(start.column - 1..))
        .is_some_and(|rest| rest.starts_with(&bracketed))
}

/// Collects literal text of node and its descendants.
///
/// Inline leaves give their text, raw blocks their lines verbatim, line
/// breaks a newline. Formatting is discarded.
fn raw_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut buf = String::new();
    raw_text_into(&mut buf, node);
    buf
}

fn raw_text_into<'a>(buf: &mut String, node: &'a AstNode<'a>) {
    match &node.data.borrow().value {
        NodeValue::Text(text) | NodeValue::HtmlInline(text) => buf.push_str(text),
        NodeValue::Code(code) => buf.push_str(&code.literal),
        NodeValue::CodeBlock(code) => buf.push_str(&code.literal),
        NodeValue::HtmlBlock(html) => buf.push_str(&html.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => buf.push('\n'),
        _ => {
            for child in node.children() {
                raw_text_into(buf, child);
            }
        }
    }
}

/// Returns literal of a plain text leaf.
fn text_literal<'a>(node: &'a AstNode<'a>) -> Option<String> {
    match &node.data.borrow().value {
        NodeValue::Text(text) => Some(text.clone()),
        _ => None,
    }
}

/// Converts GitHub Flavored Markdown into chat message blocks.
///
/// Each top level node becomes exactly one block: lists become bullets,
/// code blocks become code, everything else becomes rich markup text.
/// Nested lists are flattened into indented lines inside one bullet since
/// the chat format supports a single bullet level. When a manager
/// directory is configured, `@username` tokens resolve to mention links.
///
/// Conversion never fails: unsupported constructs degrade to plain text.
pub struct MarkdownConverter<'d, D: ManagerDirectory + ?Sized = Managers> {
    options: Options<'static>,
    directory: Option<&'d D>,
}

impl MarkdownConverter<'static, Managers> {
    /// Creates converter without mention resolution.
    pub fn new() -> Self {
        Self {
            options: parse_options(),
            directory: None,
        }
    }
}

impl Default for MarkdownConverter<'static, Managers> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser options: GFM extensions, no smart punctuation.
///
/// Smart punctuation stays off so quotes and apostrophes reach the chat
/// exactly as written.
fn parse_options() -> Options<'static> {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

impl<'d, D: ManagerDirectory + ?Sized> MarkdownConverter<'d, D> {
    /// Creates converter resolving mentions against the given directory.
    ///
    /// # Arguments
    ///
    /// * `directory`: Manager lookup keyed by lowercase GitHub username
    pub fn with_directory(directory: &'d D) -> Self {
        Self {
            options: parse_options(),
            directory: Some(directory),
        }
    }

    /// Converts markdown source into message blocks.
    ///
    /// Invalid UTF8 sequences are replaced before parsing.
    ///
    /// # Arguments
    ///
    /// * `source`: Raw markdown bytes
    ///
    /// # Returns
    ///
    /// One block per top level markdown node, in document order
    pub fn convert(&self, source: &[u8]) -> Vec<MessageBlock> {
        let text = String::from_utf8_lossy(source);
        self.convert_str(&text)
    }

    /// Converts markdown text into message blocks.
    pub fn convert_str(&self, source: &str) -> Vec<MessageBlock> {
        let arena = Arena::new();
        let root = parse_document(&arena, source, &self.options);

        let renderer = Renderer {
            directory: self.directory,
            source,
        };

        let blocks: Vec<MessageBlock> = root
            .children()
            .map(|child| {
                let block = renderer.build_block(child);
                tracing::trace!(kind = block.kind(), "Built block");
                block
            })
            .collect();

        tracing::debug!(
            bytes = source.len(),
            blocks = blocks.len(),
            "Converted markdown"
        );

        blocks
    }

    /// Converts markdown file at given path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read
    pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<Vec<MessageBlock>> {
        let path = path.as_ref();
        let source = std::fs::read(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;
        Ok(self.convert(&source))
    }
}

/// Rendering state for one conversion.
struct Renderer<'r, D: ManagerDirectory + ?Sized> {
    directory: Option<&'r D>,
    source: &'r str,
}

impl<'r, D: ManagerDirectory + ?Sized> Renderer<'r, D> {
    fn kind<'a>(&self, node: &'a AstNode<'a>) -> NodeKind {
        NodeKind::of(node, self.source)
    }

    /// Builds the block for one top level node.
    fn build_block<'a>(&self, node: &'a AstNode<'a>) -> MessageBlock {
        match self.kind(node) {
            NodeKind::List { .. } => MessageBlock::bullets(
                node.children()
                    .map(|item| MessageBlock::text(self.render_list_text(item)))
                    .collect(),
            ),
            // Code language is dropped, the chat block schema does not document it
            NodeKind::CodeBlock => MessageBlock::code(raw_text(node), None),
            _ => MessageBlock::text(self.render_text(node, true)),
        }
    }

    /// Renders node as rich markup.
    ///
    /// # Arguments
    ///
    /// * `node`: Node to render
    /// * `escape`: Whether literal text is escaped for markup
    fn render_text<'a>(&self, node: &'a AstNode<'a>, escape: bool) -> String {
        let mut buf = String::new();
        self.render_text_into(&mut buf, node, escape);
        buf
    }

    fn render_text_into<'a>(&self, buf: &mut String, node: &'a AstNode<'a>, escape: bool) {
        match self.kind(node) {
            NodeKind::Emphasis => buf.push_str(&italic(&self.render_raw(node, escape))),
            NodeKind::Strong | NodeKind::Heading => {
                buf.push_str(&bold(&self.render_raw(node, escape)))
            }
            NodeKind::AutoLink { url } => {
                // Shown URL text is escaped only, mentions inside URLs stay literal
                let text = reference_text(&url);
                let text = if escape { escaped_string(&text) } else { text };
                buf.push_str(&inline_link(&url, &text));
            }
            NodeKind::Link { url } => {
                buf.push_str(&inline_link(&url, &self.render_raw(node, escape)));
            }
            NodeKind::CodeSpan => {
                buf.push('`');
                buf.push_str(&self.render_raw(node, escape));
                buf.push('`');
            }
            NodeKind::LineBreak => buf.push('\n'),
            NodeKind::Text => buf.push_str(&self.render_raw(node, escape)),
            kind => {
                if kind.is_raw() || node.first_child().is_none() {
                    buf.push_str(&self.render_raw(node, escape));
                } else {
                    self.render_children_into(buf, node, escape);
                }
            }
        }
    }

    /// Renders children in order, merging adjacent text leaves.
    ///
    /// The parser splits text at delimiter characters such as `_`, so a
    /// token like `@some_user` may span several leaves. Merging keeps it
    /// whole for mention resolution.
    fn render_children_into<'a>(&self, buf: &mut String, node: &'a AstNode<'a>, escape: bool) {
        let mut pending = String::new();

        for child in node.children() {
            if let Some(text) = text_literal(child) {
                pending.push_str(&text);
                continue;
            }

            if !pending.is_empty() {
                buf.push_str(&self.finish_text(std::mem::take(&mut pending), escape));
            }
            self.render_text_into(buf, child, escape);
        }

        if !pending.is_empty() {
            buf.push_str(&self.finish_text(pending, escape));
        }
    }

    /// Extracts literal text of node, escaped and mention substituted.
    fn render_raw<'a>(&self, node: &'a AstNode<'a>, escape: bool) -> String {
        self.finish_text(raw_text(node), escape)
    }

    fn finish_text(&self, text: String, escape: bool) -> String {
        let text = if escape { escaped_string(&text) } else { text };
        substitute_mentions(&text, &self.directory)
    }

    /// Renders one top level list item as a single string.
    fn render_list_text<'a>(&self, node: &'a AstNode<'a>) -> String {
        let mut buf = String::new();
        self.render_list_into(&mut buf, node, 0);
        buf
    }

    /// Flattens nested lists into indented lines.
    ///
    /// Nested items are written as `offset` spaces, the list marker and
    /// the item content. Each nesting level indents by the content padding
    /// of the enclosing item.
    fn render_list_into<'a>(&self, buf: &mut String, node: &'a AstNode<'a>, offset: usize) {
        match self.kind(node) {
            NodeKind::List { marker } => {
                let mut items = node.children().peekable();
                while let Some(item) = items.next() {
                    buf.extend(std::iter::repeat_n(' ', offset));
                    buf.push(marker);
                    self.render_list_into(buf, item, offset);

                    if items.peek().is_some() {
                        buf.push('\n');
                    }
                }
            }
            NodeKind::ListItem { padding } => {
                let mut children = node.children().peekable();
                while let Some(child) = children.next() {
                    if self.kind(child).is_raw() {
                        buf.push_str(&self.render_text(node, true));
                    } else {
                        self.render_list_into(buf, child, offset + padding);
                    }

                    if children.peek().is_some() {
                        buf.push('\n');
                    }
                }
            }
            _ => buf.push_str(&self.render_text(node, true)),
        }
    }
}
