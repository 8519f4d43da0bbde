//! Converts GitHub Markdown into rich text message blocks for chat.

pub mod block;
mod config;
pub mod manager;
mod markdown;
pub mod markup;

pub use block::{Message, MessageBlock, to_json, to_json_pretty};
pub use config::Config;
pub use manager::{Manager, ManagerDirectory, Managers};
pub use markdown::{MarkdownConverter, github_reference, reference_text, substitute_mentions};
pub use markup::MentionKind;

/// Converts markdown into message blocks, resolving mentions in `directory`.
///
/// Shorthand for [`MarkdownConverter::with_directory`] followed by
/// [`MarkdownConverter::convert`].
pub fn convert<D: ManagerDirectory + ?Sized>(source: &[u8], directory: &D) -> Vec<MessageBlock> {
    MarkdownConverter::with_directory(directory).convert(source)
}
