//! Page model and related DTOs.

use lectern_core::content_tree::{SeoMetadata, VersionedContent};
use lectern_core::error::CoreError;
use lectern_core::page_lifecycle::PageStatus;
use lectern_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::deserialize_some;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub path: String,
    pub title: String,
    pub content_tree: serde_json::Value,
    pub seo_metadata: Option<Json<SeoMetadata>>,
    pub status: String,
    pub version: VersionNumber,
    pub published_at: Option<Timestamp>,
    pub parent_id: Option<DbId>,
    pub position: i32,
    pub is_template: bool,
    pub template_name: Option<String>,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Page {
    /// Parsed lifecycle status. The column is CHECK-constrained, so a parse
    /// failure means the schema and the code disagree.
    pub fn lifecycle_status(&self) -> Result<PageStatus, CoreError> {
        self.status.parse::<PageStatus>().map_err(|_| {
            CoreError::Internal(format!("Unknown page status '{}' in database", self.status))
        })
    }

    pub fn seo(&self) -> Option<&SeoMetadata> {
        self.seo_metadata.as_ref().map(|json| &json.0)
    }

    /// The fields captured by a version snapshot.
    pub fn content(&self) -> VersionedContent<'_> {
        VersionedContent {
            title: &self.title,
            content_tree: &self.content_tree,
            seo_metadata: self.seo(),
        }
    }
}

/// DTO for creating a new page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePage {
    pub title: String,
    /// Derived from the title if `None`.
    pub path: Option<String>,
    /// An empty root container if `None`.
    pub content_tree: Option<serde_json::Value>,
    pub seo_metadata: Option<SeoMetadata>,
    pub is_template: Option<bool>,
    pub template_name: Option<String>,
    pub parent_id: Option<DbId>,
}

/// DTO for a partial page update.
///
/// Absent fields are left untouched. `seo_metadata` and `parent_id` are
/// nullable: an explicit `null` clears them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePage {
    /// The version the caller last observed.
    pub expected_version: VersionNumber,
    pub title: Option<String>,
    pub path: Option<String>,
    pub content_tree: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub seo_metadata: Option<Option<SeoMetadata>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<DbId>>,
    pub position: Option<i32>,
}

/// DTO for restoring a historical snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackPage {
    pub target_version: VersionNumber,
    pub expected_version: VersionNumber,
}

/// Optional filters for page listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageListFilter {
    pub status: Option<String>,
    pub parent_id: Option<DbId>,
    pub is_template: Option<bool>,
}
