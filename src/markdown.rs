//! GitHub Flavored Markdown conversion into chat message blocks.
//!
//! This module parses markdown with comrak using GFM extensions (tables,
//! strikethrough, autolinks, task lists) and walks the resulting AST to
//! produce message blocks, resolving `@username` mentions and shortening
//! GitHub issue, pull request and compare URLs.

mod converter;
mod mentions;
mod references;

pub use converter::MarkdownConverter;
pub use mentions::substitute_mentions;
pub use references::{github_reference, reference_text};
