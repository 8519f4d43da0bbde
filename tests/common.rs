//! Shared test utilities for integration tests.
//!
//! Provides fixture loading and a sample manager directory used across
//! multiple test files.

#![allow(dead_code)]

use anyhow::{Context, Result};
use ghblocks::Managers;
use std::path::PathBuf;

/// Returns path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Reads fixture file as raw bytes.
///
/// # Errors
///
/// Returns error if the fixture does not exist
pub fn read_fixture(name: &str) -> Result<Vec<u8>> {
    let path = fixture_path(name);
    std::fs::read(&path).with_context(|| format!("Missing fixture: {}", path.display()))
}

/// Loads the sample manager directory from `managers.json`.
///
/// # Errors
///
/// Returns error if the fixture cannot be read or parsed
pub fn sample_managers() -> Result<Managers> {
    Managers::from_path(fixture_path("managers.json"))
}

/// Expected markup for a GitHub pull request or issue autolink.
pub fn github_link(kind: &str, number: u32) -> String {
    format!(
        "<link type=\"url\" value=\"https://github.com/channel-io/ch-inhouse-frontend/{}/{}\">#{}</link>",
        kind, number, number
    )
}
