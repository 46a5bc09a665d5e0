//! Route definitions for version snapshots.
//!
//! Registered under `/versions`. Per-page history lives under
//! `/pages/{id}/versions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// ```text
/// GET /compare     compare_versions
/// GET /{id}        get_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compare", get(versions::compare_versions))
        .route("/{id}", get(versions::get_version))
}
