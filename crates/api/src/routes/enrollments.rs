//! Route definitions for enrollments and their per-day progress.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{enrollments, progress};
use crate::state::AppState;

/// Routes mounted at `/enrollments`.
///
/// ```text
/// POST   /                    -> create
/// GET    /?email=...          -> list
/// GET    /{id}                -> get_by_id
/// PUT    /{id}/days/{day}     -> set_day
/// GET    /{id}/progress       -> progress ledger
/// GET    /{id}/calendar       -> resolved day grid
/// GET    /{id}/alerts         -> alert history
/// POST   /{id}/abandon        -> abandon
/// POST   /{id}/pause          -> pause
/// POST   /{id}/resume         -> resume
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(enrollments::create).get(enrollments::list))
        .route("/{id}", get(enrollments::get_by_id))
        .route("/{id}/days/{day}", put(progress::set_day))
        .route("/{id}/progress", get(progress::list))
        .route("/{id}/calendar", get(progress::calendar))
        .route("/{id}/alerts", get(progress::alerts))
        .route("/{id}/abandon", post(enrollments::abandon))
        .route("/{id}/pause", post(enrollments::pause))
        .route("/{id}/resume", post(enrollments::resume))
}
