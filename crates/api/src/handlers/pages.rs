//! Handlers for the page store and lifecycle.
//!
//! Every write goes through a transactional repository call. Versioned
//! writes (update, rollback) require the caller's `expected_version`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use lectern_core::types::DbId;
use lectern_db::models::page::{CreatePage, PageListFilter, RollbackPage, UpdatePage};
use lectern_db::models::Paginated;
use lectern_db::repositories::PageRepo;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::query::{PaginationParams, PathParam};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct ListPagesParams {
    pub status: Option<String>,
    pub parent_id: Option<DbId>,
    pub is_template: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/* --------------------------------------------------------------------------
Reads
-------------------------------------------------------------------------- */

/// GET /pages
///
/// List pages in tree order with optional status/parent/template filters.
pub async fn list_pages(
    State(state): State<AppState>,
    Query(params): Query<ListPagesParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .clamped();
    let filter = PageListFilter {
        status: params.status,
        parent_id: params.parent_id,
        is_template: params.is_template,
    };

    let (items, total) = PageRepo::list(&state.pool, &filter, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Paginated { items, total },
    }))
}

/// GET /pages/{id}
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::get_by_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /pages/by-path?path=
///
/// The lookup path is normalized the same way paths are on write.
pub async fn get_page_by_path(
    State(state): State<AppState>,
    Query(params): Query<PathParam>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::get_by_path(&state.pool, &params.path).await?;
    Ok(Json(DataResponse { data: page }))
}

/* --------------------------------------------------------------------------
Writes
-------------------------------------------------------------------------- */

/// POST /pages
///
/// Create a draft page at version 1. The path is derived from the title
/// when omitted.
pub async fn create_page(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::create(&state.pool, &input, &actor.id).await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        page_id = page.id,
        path = %page.path,
        "Page created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// PUT /pages/{id}
///
/// Apply a partial update as a new version. Fails with 409
/// `VERSION_CONFLICT` when `expected_version` is stale.
pub async fn update_page(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::update(&state.pool, id, &input, &actor.id).await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        page_id = page.id,
        version = page.version,
        path = %page.path,
        "Page updated"
    );

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /pages/{id}
///
/// Remove a page and its snapshots. Redirects are kept.
pub async fn delete_page(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PageRepo::remove(&state.pool, id).await?;

    tracing::info!(actor = %actor.id, role = ?actor.role, page_id = id, "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Lifecycle
-------------------------------------------------------------------------- */

/// POST /pages/{id}/publish
pub async fn publish_page(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::publish(&state.pool, id).await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        page_id = page.id,
        version = page.version,
        "Page published"
    );

    Ok(Json(DataResponse { data: page }))
}

/// POST /pages/{id}/unpublish
pub async fn unpublish_page(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::unpublish(&state.pool, id).await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        page_id = page.id,
        version = page.version,
        "Page unpublished"
    );

    Ok(Json(DataResponse { data: page }))
}

/// POST /pages/{id}/rollback
///
/// Restore the content of `target_version` as a new version. The state
/// being replaced is snapshotted first, so a rollback can itself be undone.
pub async fn rollback_page(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RollbackPage>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::rollback(
        &state.pool,
        id,
        input.target_version,
        input.expected_version,
        &actor.id,
    )
    .await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        page_id = page.id,
        target_version = input.target_version,
        version = page.version,
        "Page rolled back"
    );

    Ok(Json(DataResponse { data: page }))
}
