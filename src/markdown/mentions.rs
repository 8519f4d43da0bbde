//! `@username` mention substitution.

use regex::Regex;
use std::sync::LazyLock;

use crate::manager::ManagerDirectory;
use crate::markup::{MentionKind, mention};

static MENTION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_-]+").expect("mention pattern is valid"));

/// Replaces resolvable `@username` tokens with manager mention links.
///
/// Tokens are collected in one pass and the output is rebuilt span by
/// span, so text introduced by a replacement is never scanned again.
/// Lookup lowercases the username; unresolved tokens are kept verbatim.
///
/// # Arguments
///
/// * `text`: Text to scan, already escaped when escaping applies
/// * `directory`: Manager lookup keyed by lowercase GitHub username
///
/// # Returns
///
/// Text with resolved tokens replaced
pub fn substitute_mentions<D: ManagerDirectory + ?Sized>(text: &str, directory: &D) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for token in MENTION_TOKEN.find_iter(text) {
        let username = token.as_str()[1..].to_lowercase();
        let Some(manager) = directory.lookup(&username) else {
            continue;
        };

        tracing::trace!(username = %username, manager_id = %manager.id, "Resolved mention");

        result.push_str(&text[last_end..token.start()]);
        result.push_str(&mention(MentionKind::Manager, &manager.id, &manager.name));
        last_end = token.end();
    }

    result.push_str(&text[last_end..]);
    result
}
