//! Route definitions for the redirect ledger.
//!
//! Registered under `/redirects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::redirects;
use crate::state::AppState;

/// ```text
/// GET    /              list_redirects
/// PUT    /              upsert_redirect
/// GET    /resolve       resolve_redirect
/// GET    /{id}          get_redirect
/// DELETE /{id}          delete_redirect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(redirects::list_redirects).put(redirects::upsert_redirect),
        )
        .route("/resolve", get(redirects::resolve_redirect))
        .route(
            "/{id}",
            get(redirects::get_redirect).delete(redirects::delete_redirect),
        )
}
