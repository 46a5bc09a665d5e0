//! Actor identification extractor for mutating handlers.
//!
//! Authentication is handled upstream. This service only needs to know
//! which actor a write belongs to so it can be recorded on snapshots.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lectern_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Optional header carrying the acting user's role. Logged only.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The actor performing a write, read from the `X-Actor-Id` header.
///
/// ```ignore
/// async fn my_handler(actor: Actor) -> AppResult<Json<()>> {
///     tracing::info!(actor = %actor.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Option<String>,
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-Actor-Id header".into()))
            })?;

        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Actor {
            id: id.to_string(),
            role,
        })
    }
}
