//! Page content documents: the component tree, SEO metadata, and the
//! structural comparison used when diffing two version snapshots.
//!
//! The component tree is opaque to the versioning engine. It is copied into
//! snapshots verbatim and compared by deep equality, never by text.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CoreError;

/// Maximum serialized size of a content tree (bytes).
pub const MAX_CONTENT_TREE_BYTES: usize = 1_000_000;

pub const MAX_SEO_TITLE_LENGTH: usize = 200;
pub const MAX_SEO_DESCRIPTION_LENGTH: usize = 500;

/// The tree a page starts with when none is supplied: an empty root container.
pub fn default_content_tree() -> Value {
    json!({
        "type": "root",
        "props": {},
        "children": []
    })
}

/// The root of a component tree must be a JSON object.
pub fn validate_content_tree(tree: &Value) -> Result<(), CoreError> {
    if !tree.is_object() {
        return Err(CoreError::Validation(
            "Content tree root must be a JSON object".into(),
        ));
    }
    let size = tree.to_string().len();
    if size > MAX_CONTENT_TREE_BYTES {
        return Err(CoreError::Validation(format!(
            "Content tree must be at most {MAX_CONTENT_TREE_BYTES} bytes (got {size})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SEO metadata
// ---------------------------------------------------------------------------

/// Per-page search-engine metadata. Read by downstream SEO tooling, never
/// interpreted by the versioning engine.
///
/// Only the well-known keys are validated. Any other key is kept in `extra`
/// and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub no_index: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validate SEO metadata field lengths and the canonical URL shape.
pub fn validate_seo_metadata(seo: &SeoMetadata) -> Result<(), CoreError> {
    if let Some(title) = &seo.title {
        if title.chars().count() > MAX_SEO_TITLE_LENGTH {
            return Err(CoreError::Validation(format!(
                "SEO title must be at most {MAX_SEO_TITLE_LENGTH} characters"
            )));
        }
    }
    if let Some(description) = &seo.description {
        if description.chars().count() > MAX_SEO_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "SEO description must be at most {MAX_SEO_DESCRIPTION_LENGTH} characters"
            )));
        }
    }
    if let Some(url) = &seo.canonical_url {
        let ok = url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/');
        if !ok {
            return Err(CoreError::Validation(format!(
                "Canonical URL '{url}' must be absolute (http/https) or site-relative"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Snapshot comparison
// ---------------------------------------------------------------------------

/// The versioned fields of a page or snapshot, borrowed for comparison.
#[derive(Debug, Clone, Copy)]
pub struct VersionedContent<'a> {
    pub title: &'a str,
    pub content_tree: &'a Value,
    pub seo_metadata: Option<&'a SeoMetadata>,
}

/// Which versioned fields differ between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionDiff {
    pub title_changed: bool,
    pub content_tree_changed: bool,
    pub seo_changed: bool,
}

impl VersionDiff {
    pub fn is_identical(&self) -> bool {
        !(self.title_changed || self.content_tree_changed || self.seo_changed)
    }
}

/// Compare two snapshots field by field using deep equality.
///
/// Object key order inside the tree is irrelevant; array order is not.
pub fn compare(a: VersionedContent<'_>, b: VersionedContent<'_>) -> VersionDiff {
    VersionDiff {
        title_changed: a.title != b.title,
        content_tree_changed: a.content_tree != b.content_tree,
        seo_changed: a.seo_metadata != b.seo_metadata,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
