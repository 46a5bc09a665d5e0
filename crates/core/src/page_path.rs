//! Page path (slug) normalization and validation.
//!
//! Create and update both go through [`PagePath`], so there is exactly one
//! grammar for what a page path may look like:
//!
//! ```text
//! /                      root
//! /about                 one segment
//! /blog/hello-world      nested segments
//! ```
//!
//! Segments are lowercase ASCII alphanumerics joined by single hyphens.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Maximum length of a normalized path, including the leading slash.
pub const MAX_PATH_LENGTH: usize = 255;

const PATH_PATTERN: &str = r"^/([a-z0-9]+(-[a-z0-9]+)*(/[a-z0-9]+(-[a-z0-9]+)*)*)?$";

static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATH_PATTERN).expect("valid regex"));

/// A normalized, validated page path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PagePath(String);

impl PagePath {
    /// Normalize and validate an explicitly supplied path.
    ///
    /// Normalization trims whitespace, lowercases, adds a missing leading
    /// slash and drops a single trailing slash. Anything that still does not
    /// match the path grammar is a `Validation` error.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Path must not be empty".into()));
        }

        let mut path = trimmed.to_lowercase();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if path.len() > 1 && path.ends_with('/') && !path.ends_with("//") {
            path.pop();
        }

        if path.len() > MAX_PATH_LENGTH {
            return Err(CoreError::Validation(format!(
                "Path must be at most {MAX_PATH_LENGTH} characters"
            )));
        }
        if !PATH_RE.is_match(&path) {
            return Err(CoreError::Validation(format!(
                "Invalid path '{}': segments must be lowercase alphanumerics \
                 separated by single hyphens",
                raw.trim()
            )));
        }
        Ok(Self(path))
    }

    /// Derive a path from a page title.
    ///
    /// Whitespace, underscores and hyphens become a single hyphen, other
    /// punctuation is dropped, and the result is prefixed with `/`.
    pub fn from_title(title: &str) -> Result<Self, CoreError> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_hyphen = false;
        for c in title.trim().to_lowercase().chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            } else if c.is_whitespace() || c == '-' || c == '_' {
                pending_hyphen = true;
            }
        }

        if slug.is_empty() {
            return Err(CoreError::Validation(format!(
                "Cannot derive a path from title '{title}'"
            )));
        }
        Self::parse(&slug)
    }

    /// Use the explicit path when one is supplied, otherwise derive it from
    /// the title.
    pub fn resolve(explicit: Option<&str>, title: &str) -> Result<Self, CoreError> {
        match explicit {
            Some(raw) => Self::parse(raw),
            None => Self::from_title(title),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
