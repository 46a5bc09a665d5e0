//! Redirect ledger model and DTOs.

use lectern_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `redirects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Redirect {
    pub id: DbId,
    pub from_path: String,
    pub to_path: String,
    pub status_code: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The answer to "where does this path go now?".
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct RedirectTarget {
    pub to_path: String,
    pub status_code: i16,
}

/// DTO for a manual redirect upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRedirect {
    pub from_path: String,
    pub to_path: String,
    /// 301 if `None`.
    pub status_code: Option<i16>,
}
