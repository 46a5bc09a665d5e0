//! Route definitions for the page store and its lifecycle.
//!
//! Registered under `/pages`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{pages, versions};
use crate::state::AppState;

/// Page routes, registered as `/pages`.
///
/// ```text
/// GET    /                    list_pages
/// POST   /                    create_page
/// GET    /by-path             get_page_by_path
/// GET    /{id}                get_page
/// PUT    /{id}                update_page
/// DELETE /{id}                delete_page
/// POST   /{id}/publish        publish_page
/// POST   /{id}/unpublish      unpublish_page
/// GET    /{id}/versions       list_page_versions
/// POST   /{id}/rollback       rollback_page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route("/by-path", get(pages::get_page_by_path))
        .route(
            "/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/{id}/publish", post(pages::publish_page))
        .route("/{id}/unpublish", post(pages::unpublish_page))
        .route("/{id}/versions", get(versions::list_page_versions))
        .route("/{id}/rollback", post(pages::rollback_page))
}
