pub mod challenges;
pub mod enrollments;
pub mod escalation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /challenges                       list active challenges
/// /challenges/{slug}                challenge detail
///
/// /enrollments                      create (POST), list by email (GET)
/// /enrollments/{id}                 enrollment detail
/// /enrollments/{id}/days/{day}      set day completion (PUT)
/// /enrollments/{id}/progress        progress ledger
/// /enrollments/{id}/calendar        resolved day grid
/// /enrollments/{id}/alerts          escalation alert history
/// /enrollments/{id}/abandon         opt out (POST)
/// /enrollments/{id}/pause           pause (POST)
/// /enrollments/{id}/resume          resume (POST)
///
/// /escalation/run                   trigger one sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/challenges", challenges::router())
        .nest("/enrollments", enrollments::router())
        .nest("/escalation", escalation::router())
}
