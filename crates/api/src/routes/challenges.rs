//! Route definitions for the challenge catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::challenges;
use crate::state::AppState;

/// Routes mounted at `/challenges`.
///
/// ```text
/// GET /          -> list
/// GET /{slug}    -> get_by_slug
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(challenges::list))
        .route("/{slug}", get(challenges::get_by_slug))
}
