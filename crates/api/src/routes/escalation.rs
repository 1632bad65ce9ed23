//! Route definitions for the escalation sweep trigger.

use axum::routing::post;
use axum::Router;

use crate::handlers::escalation;
use crate::state::AppState;

/// Routes mounted at `/escalation`.
///
/// ```text
/// POST /run    -> run one sweep now
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/run", post(escalation::run))
}
