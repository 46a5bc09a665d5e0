//! Page version model.
//!
//! Versions are immutable snapshots of a page's title, content tree and SEO
//! metadata, captured immediately before every versioned mutation.

use lectern_core::content_tree::{SeoMetadata, VersionDiff, VersionedContent};
use lectern_core::types::{DbId, Timestamp, VersionNumber};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `page_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageVersion {
    pub id: DbId,
    pub page_id: DbId,
    /// The page's version number at the moment this snapshot was taken.
    pub version: VersionNumber,
    pub title: String,
    pub content_tree: serde_json::Value,
    pub seo_metadata: Option<Json<SeoMetadata>>,
    pub created_by: String,
    pub created_at: Timestamp,
}

impl PageVersion {
    pub fn content(&self) -> VersionedContent<'_> {
        VersionedContent {
            title: &self.title,
            content_tree: &self.content_tree,
            seo_metadata: self.seo_metadata.as_ref().map(|json| &json.0),
        }
    }
}

/// Response for a structural comparison of two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct VersionComparison {
    pub version_a: DbId,
    pub version_b: DbId,
    #[serde(flatten)]
    pub diff: VersionDiff,
}
