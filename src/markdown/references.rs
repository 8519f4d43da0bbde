//! Short reference text for GitHub issue, pull request and compare URLs.

use regex::Regex;
use std::sync::LazyLock;

static ISSUE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/[^/]+/[^/]+/(?:issues|pull)/([0-9]+)")
        .expect("issue URL pattern is valid")
});

static COMPARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/[^/]+/[^/]+/compare/([^/]+)")
        .expect("compare URL pattern is valid")
});

/// Derives short reference text for a GitHub URL.
///
/// Recognized forms:
/// - `https://github.com/<owner>/<repo>/pull/<n>` and `.../issues/<n>`
///   give `#<n>`
/// - `https://github.com/<owner>/<repo>/compare/<range>` gives `<range>`
///
/// # Arguments
///
/// * `url`: Link destination
///
/// # Returns
///
/// Reference text, or `None` when the URL is not a recognized GitHub link
pub fn github_reference(url: &str) -> Option<String> {
    if let Some(captures) = ISSUE_URL.captures(url) {
        return Some(format!("#{}", &captures[1]));
    }

    COMPARE_URL
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Returns link text for an autolinked URL.
///
/// Falls back to the URL itself when it is not a GitHub reference.
pub fn reference_text(url: &str) -> String {
    github_reference(url).unwrap_or_else(|| url.to_string())
}
