pub mod health;
pub mod pages;
pub mod redirects;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                          list, create
/// /pages/by-path                  lookup by normalized path (?path=)
/// /pages/{id}                     get, update, delete
/// /pages/{id}/publish             publish (POST)
/// /pages/{id}/unpublish           unpublish (POST)
/// /pages/{id}/versions            snapshot history (GET)
/// /pages/{id}/rollback            restore a snapshot (POST)
///
/// /versions/compare               structural diff (?a=&b=)
/// /versions/{id}                  single snapshot
///
/// /redirects                      list, upsert (PUT)
/// /redirects/resolve              one-hop lookup (?path=)
/// /redirects/{id}                 get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pages", pages::router())
        .nest("/versions", versions::router())
        .nest("/redirects", redirects::router())
}
