//! Handlers for version snapshots: history, single lookup, comparison.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use lectern_core::types::DbId;
use lectern_db::models::page_version::VersionComparison;
use lectern_db::models::Paginated;
use lectern_db::repositories::{PageRepo, PageVersionRepo};

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareParams {
    pub a: DbId,
    pub b: DbId,
}

/// GET /pages/{id}/versions
///
/// Snapshot history for a page, newest first.
pub async fn list_page_versions(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    PageRepo::get_by_id(&state.pool, page_id).await?;

    let (limit, offset) = params.clamped();
    let (items, total) = PageVersionRepo::list_by_page(&state.pool, page_id, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Paginated { items, total },
    }))
}

/// GET /versions/{id}
pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let version = PageVersionRepo::get_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: version }))
}

/// GET /versions/compare?a=&b=
///
/// Report which snapshot fields differ between two versions.
pub async fn compare_versions(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let diff = PageVersionRepo::compare(&state.pool, params.a, params.b).await?;

    Ok(Json(DataResponse {
        data: VersionComparison {
            version_a: params.a,
            version_b: params.b,
            diff,
        },
    }))
}
