//! Shared query parameter types for API handlers.

use lectern_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to `(limit, offset)` within the configured bounds.
    pub fn clamped(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// `?path=` lookup parameter.
#[derive(Debug, Deserialize)]
pub struct PathParam {
    pub path: String,
}
