//! Handlers for the redirect ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use lectern_core::error::CoreError;
use lectern_core::page_path::PagePath;
use lectern_core::types::DbId;
use lectern_db::models::redirect::UpsertRedirect;
use lectern_db::models::Paginated;
use lectern_db::repositories::RedirectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::Actor;
use crate::query::{PaginationParams, PathParam};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /redirects
pub async fn list_redirects(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.clamped();
    let (items, total) = RedirectRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Paginated { items, total },
    }))
}

/// PUT /redirects
///
/// Insert or overwrite the redirect for `from_path`.
pub async fn upsert_redirect(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<UpsertRedirect>,
) -> AppResult<impl IntoResponse> {
    let redirect = RedirectRepo::upsert_manual(&state.pool, &input).await?;

    tracing::info!(
        actor = %actor.id,
        role = ?actor.role,
        redirect_id = redirect.id,
        from_path = %redirect.from_path,
        to_path = %redirect.to_path,
        status_code = redirect.status_code,
        "Redirect upserted"
    );

    Ok(Json(DataResponse { data: redirect }))
}

/// GET /redirects/resolve?path=
///
/// Single exact-match hop. Chains are not followed.
pub async fn resolve_redirect(
    State(state): State<AppState>,
    Query(params): Query<PathParam>,
) -> AppResult<impl IntoResponse> {
    let path = PagePath::parse(&params.path)?;
    let target = RedirectRepo::resolve(&state.pool, &path)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::path_not_found("Redirect", path.as_str())))?;

    Ok(Json(DataResponse { data: target }))
}

/// GET /redirects/{id}
pub async fn get_redirect(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let redirect = RedirectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Redirect", id)))?;

    Ok(Json(DataResponse { data: redirect }))
}

/// DELETE /redirects/{id}
pub async fn delete_redirect(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RedirectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Redirect", id)));
    }

    tracing::info!(actor = %actor.id, role = ?actor.role, redirect_id = id, "Redirect deleted");

    Ok(StatusCode::NO_CONTENT)
}
