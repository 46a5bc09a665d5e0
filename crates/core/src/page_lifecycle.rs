//! Page lifecycle statuses and the publish/unpublish state machine.
//!
//! Transition rules:
//! - `publish`:   any status except `published` -> `published`
//! - `unpublish`: `published` -> `draft`
//!
//! Neither transition touches the page's version counter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_REVIEW: &str = "review";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid page statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_REVIEW,
    STATUS_PUBLISHED,
    STATUS_ARCHIVED,
];

/// Lifecycle status of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Draft,
    Review,
    Published,
    Archived,
}

impl PageStatus {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Review => STATUS_REVIEW,
            Self::Published => STATUS_PUBLISHED,
            Self::Archived => STATUS_ARCHIVED,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_REVIEW => Ok(Self::Review),
            STATUS_PUBLISHED => Ok(Self::Published),
            STATUS_ARCHIVED => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Invalid page status '{}'. Must be one of: {}",
                other,
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

/// Compute the status a page moves to when published.
pub fn publish_transition(current: PageStatus) -> Result<PageStatus, CoreError> {
    if current.is_published() {
        return Err(CoreError::BadRequest("Page is already published".into()));
    }
    Ok(PageStatus::Published)
}

/// Compute the status a page moves to when unpublished.
pub fn unpublish_transition(current: PageStatus) -> Result<PageStatus, CoreError> {
    if !current.is_published() {
        return Err(CoreError::BadRequest(
            "Page is not currently published".into(),
        ));
    }
    Ok(PageStatus::Draft)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
